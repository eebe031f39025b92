//! Delay between consecutive sends.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Waits between two posted messages.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn wait(&self, delay: Duration);
}

/// Sleeps on the tokio timer. Cancelling the token cuts every current and
/// future wait short.
#[derive(Debug, Clone, Default)]
pub struct TokioPacer {
    cancel: CancellationToken,
}

impl TokioPacer {
    #[must_use]
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

#[async_trait]
impl Pacer for TokioPacer {
    async fn wait(&self, delay: Duration) {
        if delay.is_zero() || self.cancel.is_cancelled() {
            return;
        }

        info!(secs = delay.as_secs(), "Waiting before next message");
        tokio::select! {
            () = self.cancel.cancelled() => {
                debug!("Pacing wait cancelled");
            }
            () = tokio::time::sleep(delay) => {}
        }
    }
}
