//! ClickUp username to Slack mention resolution.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::MappingError;

/// Mention used when nobody can be named.
pub const DEFAULT_MENTION: &str = "@channel";

/// What to emit for a username that has no mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackBehavior {
    /// The bare ClickUp username, untagged.
    #[default]
    #[serde(rename = "use_clickup_name", alias = "use_source_name")]
    UseSourceName,
    /// The configured default mention.
    #[serde(rename = "use_default")]
    UseDefault,
    /// A value this version does not know; unmapped users get `@channel`.
    #[serde(rename = "unrecognized", other)]
    Unrecognized,
}

impl FallbackBehavior {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UseSourceName => "use_clickup_name",
            Self::UseDefault => "use_default",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// Username mapping file contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionMapping {
    #[serde(default)]
    pub user_mappings: BTreeMap<String, String>,
    #[serde(default = "default_mention")]
    pub default_mention: String,
    #[serde(default)]
    pub fallback_behavior: FallbackBehavior,
}

fn default_mention() -> String {
    DEFAULT_MENTION.to_string()
}

impl Default for MentionMapping {
    fn default() -> Self {
        Self {
            user_mappings: BTreeMap::new(),
            default_mention: default_mention(),
            fallback_behavior: FallbackBehavior::default(),
        }
    }
}

/// Outcome of a bulk import.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub added: usize,
    pub rejected: Vec<String>,
}

impl MentionMapping {
    /// Load the mapping file. A missing file yields the default mapping.
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(MappingError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw).map_err(|source| MappingError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the mapping file, falling back to defaults on any error.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load user mappings, using defaults");
            Self::default()
        })
    }

    /// Write the mapping file, pretty-printed.
    pub fn save(&self, path: &Path) -> Result<(), MappingError> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw).map_err(|source| MappingError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Add or replace one mapping.
    pub fn insert(&mut self, username: impl Into<String>, mention: impl Into<String>) {
        self.user_mappings.insert(username.into(), mention.into());
    }

    /// Import `clickup_user=slack_user` lines. Blank lines are ignored.
    pub fn import_lines(&mut self, input: &str) -> ImportReport {
        let mut report = ImportReport::default();

        for line in input.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match line.split_once('=') {
                Some((user, mention)) if !user.trim().is_empty() && !mention.trim().is_empty() => {
                    self.insert(user.trim(), mention.trim());
                    report.added += 1;
                }
                _ => report.rejected.push(line.to_string()),
            }
        }

        report
    }

    /// Mapped mention for a username, in Slack syntax.
    #[must_use]
    pub fn mention_for(&self, username: &str) -> Option<String> {
        self.user_mappings
            .get(username)
            .map(|value| format_mention(value))
    }
}

/// Render a stored mapping value as a Slack mention.
///
/// Raw Slack member ids become `<@ID>`; values already in mention syntax
/// are kept; anything else is treated as a display name.
#[must_use]
pub fn format_mention(value: &str) -> String {
    let value = value.trim();
    if value.starts_with('<') || value.starts_with('@') {
        value.to_string()
    } else if is_member_id(value) {
        format!("<@{value}>")
    } else {
        format!("@{value}")
    }
}

fn is_member_id(value: &str) -> bool {
    (value.starts_with('U') || value.starts_with('W'))
        && value.len() >= 9
        && value
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Resolves usernames against a [`MentionMapping`].
#[derive(Debug, Clone, Default)]
pub struct MentionMapper {
    mapping: MentionMapping,
}

impl MentionMapper {
    #[must_use]
    pub fn new(mapping: MentionMapping) -> Self {
        Self { mapping }
    }

    #[must_use]
    pub fn mapping(&self) -> &MentionMapping {
        &self.mapping
    }

    /// Mention for a single username.
    #[must_use]
    pub fn resolve_one(&self, username: &str) -> String {
        if let Some(mention) = self.mapping.mention_for(username) {
            debug!(username, mention = %mention, "Mapped user");
            return mention;
        }

        match self.mapping.fallback_behavior {
            FallbackBehavior::UseSourceName => {
                debug!(username, "No mapping found, using ClickUp name (untagged)");
                username.to_string()
            }
            FallbackBehavior::UseDefault => {
                debug!(username, "No mapping found, using default mention");
                self.mapping.default_mention.clone()
            }
            FallbackBehavior::Unrecognized => {
                debug!(username, "No mapping found, using @channel");
                DEFAULT_MENTION.to_string()
            }
        }
    }

    /// Mentions for a set of usernames, de-duplicated and joined for reading.
    ///
    /// An empty input yields the default mention.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(&self, usernames: &[S]) -> String {
        let mut mentions: Vec<String> = Vec::with_capacity(usernames.len());
        for username in usernames {
            let mention = self.resolve_one(username.as_ref());
            if !mentions.contains(&mention) {
                mentions.push(mention);
            }
        }

        if mentions.is_empty() {
            return self.mapping.default_mention.clone();
        }
        join_readable(&mentions)
    }
}

/// `A`, `A and B`, `A, B, and C`.
#[must_use]
pub fn join_readable(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [one] => one.clone(),
        [first, second] => format!("{first} and {second}"),
        [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
    }
}
