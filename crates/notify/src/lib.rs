//! Chat delivery for task reminder messages.
//!
//! This crate provides the outbound side of the reminder pipeline: a
//! finished message string goes in, a delivery acknowledgement (or a typed
//! delivery failure) comes out.
//!
//! # Usage
//!
//! ```no_run
//! use std::time::Duration;
//! use notify::{Sink, SlackChannel};
//!
//! # async fn example() -> Result<(), notify::DeliveryError> {
//! let slack = SlackChannel::new("xoxb-token", "C0123456", Duration::from_secs(30))?;
//! let ack = slack.post("🎉 Great job @channel! Task done!\n86abc: Ship it").await?;
//! println!("delivered at {}", ack.ts);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`Sink`] trait defines the interface the dispatch loop posts through
//! - [`SlackChannel`] posts via the Slack Web API `chat.postMessage`
//! - [`DryRunSink`] logs messages instead of delivering them

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod channels;
pub mod error;

pub use channels::dry_run::DryRunSink;
pub use channels::slack::SlackChannel;
pub use channels::{Ack, Sink};
pub use error::{DeliveryError, SlackApiError};
