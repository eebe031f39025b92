//! Message composition.
//!
//! Turns a [`ClassifiedTask`] into the outbound text: a short generated
//! line on top, the task reference underneath. Generation failures fall
//! back to canned text, so composing never fails.

pub mod fallback;
pub mod prompts;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::ai::{GenerationRequest, TextGenerator};
use crate::mention::MentionMapper;
use crate::models::ClassifiedTask;

pub use fallback::TaskType;

/// Sampling limits for generated lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComposeOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            max_tokens: 80,
            temperature: 0.7,
        }
    }
}

/// Builds reminder messages.
pub struct Composer {
    mapper: Arc<MentionMapper>,
    generator: Arc<dyn TextGenerator>,
    options: ComposeOptions,
    privileged_mention: Option<String>,
}

impl Composer {
    pub fn new(mapper: Arc<MentionMapper>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            mapper,
            generator,
            options: ComposeOptions::default(),
            privileged_mention: None,
        }
    }

    /// Assignees resolving to this mention get the respectful overdue tone.
    #[must_use]
    pub fn with_privileged_mention(mut self, mention: Option<String>) -> Self {
        self.privileged_mention = mention.filter(|m| !m.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ComposeOptions) -> Self {
        self.options = options;
        self
    }

    /// Compose the message for a task.
    pub async fn compose(&self, task: &ClassifiedTask) -> String {
        let mentions = self.mapper.resolve(task.assignees.as_slice());
        let privileged = self.is_privileged(task);

        let request = GenerationRequest {
            system: prompts::system_for(task.category, privileged),
            prompt: prompts::prompt_for(task, &mentions, privileged),
            max_tokens: self.options.max_tokens,
            temperature: self.options.temperature,
        };

        debug!(task_id = %task.id, category = %task.category, privileged, "Generating message");

        let humor = match self.generator.generate(&request).await {
            Ok(text) if !text.trim().is_empty() => {
                info!(task_id = %task.id, backend = self.generator.name(), "Generated message");
                text.trim().to_string()
            }
            Ok(_) => {
                warn!(task_id = %task.id, "Generator returned empty text, using fallback");
                fallback::humor(task.category, &task.name, &mentions, privileged)
            }
            Err(e) => {
                warn!(task_id = %task.id, error = %e, "Generation failed, using fallback");
                fallback::humor(task.category, &task.name, &mentions, privileged)
            }
        };

        format_message(&humor, task)
    }

    fn is_privileged(&self, task: &ClassifiedTask) -> bool {
        self.privileged_mention.as_deref().is_some_and(|privileged| {
            task.assignees
                .iter()
                .any(|user| self.mapper.resolve_one(user) == privileged)
        })
    }
}

/// `"{humor}\n{id}: {name}"`
#[must_use]
pub fn format_message(humor: &str, task: &ClassifiedTask) -> String {
    format!("{humor}\n{}: {}", task.id, task.name)
}
