//! Delivery channel implementations.

pub mod dry_run;
pub mod slack;

use async_trait::async_trait;

use crate::error::DeliveryError;

/// Confirmation that the chat system accepted a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    /// Channel the message landed in.
    pub channel: String,
    /// Message timestamp assigned by the chat system.
    pub ts: String,
}

/// Trait for message sinks (Slack, dry-run logging, etc.).
#[async_trait]
pub trait Sink: Send + Sync {
    /// Get the name of this sink.
    fn name(&self) -> &'static str;

    /// Deliver a finished message.
    async fn post(&self, text: &str) -> Result<Ack, DeliveryError>;
}
