use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;

/// Process-wide enrichment state: the quota circuit breaker and shutdown.
///
/// The quota flag only ever goes from false to true.
#[derive(Debug, Default)]
pub struct EnrichmentSession {
    quota_exceeded: AtomicBool,
    shutdown: CancellationToken,
}

impl EnrichmentSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quota_exceeded(&self) -> bool {
        self.quota_exceeded.load(Ordering::SeqCst)
    }

    /// Returns true only for the call that flipped the flag.
    pub fn mark_quota_exceeded(&self) -> bool {
        !self.quota_exceeded.swap(true, Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    pub fn cancel(&self) {
        self.shutdown.cancel();
    }

    pub fn token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub async fn cancelled(&self) {
        self.shutdown.cancelled().await
    }
}
