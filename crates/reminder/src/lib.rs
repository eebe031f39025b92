//! Task reminder pipeline.
//!
//! Pulls tasks from ClickUp, sorts them into reminder categories, writes a
//! short message for each one through a language model (with canned
//! fallbacks) and posts the messages to Slack, one every few minutes.
//!
//! Pipeline stages, leaves first:
//!
//! - [`mention`]: ClickUp usernames to Slack mentions
//! - [`classify`]: raw task + reference time to a [`Category`]
//! - [`compose`]: category + task to the outbound message
//! - [`dispatch`]: fetch, classify, compose, send, wait
//!
//! Every component receives its configuration explicitly; nothing below
//! [`config::Config::from_env`] reads the environment.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod ai;
pub mod classify;
pub mod compose;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod mention;
pub mod models;
pub mod pacing;

pub use ai::{GenerationRequest, OpenAiGenerator, TextGenerator};
pub use classify::{classify, evaluate, SkipReason};
pub use compose::Composer;
pub use config::{Config, ConfigPaths, Schedule};
pub use dispatch::{Dispatcher, RunOutcome, RunSummary};
pub use error::{ConfigError, GenerationError, MappingError, RunError};
pub use mention::{FallbackBehavior, MentionMapper, MentionMapping};
pub use models::{Category, ClassifiedTask};
pub use pacing::{Pacer, TokioPacer};
