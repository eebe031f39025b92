//! Sink that logs messages instead of delivering them.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::info;

use super::{Ack, Sink};
use crate::error::DeliveryError;

/// Logs every message at `info` and acknowledges it locally.
#[derive(Debug, Default)]
pub struct DryRunSink {
    posted: AtomicU64,
}

impl DryRunSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages accepted so far.
    #[must_use]
    pub fn posted(&self) -> u64 {
        self.posted.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Sink for DryRunSink {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    async fn post(&self, text: &str) -> Result<Ack, DeliveryError> {
        let seq = self.posted.fetch_add(1, Ordering::SeqCst) + 1;
        info!(sink = "dry-run", seq, "Would send:\n{text}");
        Ok(Ack {
            channel: "dry-run".to_string(),
            ts: format!("dry-run-{seq}"),
        })
    }
}
