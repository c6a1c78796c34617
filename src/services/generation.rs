use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Collapses bursts of generation requests into the last one
///
/// Every call takes a ticket and waits out the quiet period. Only the holder
/// of the newest ticket proceeds. A request already past its wait is never
/// cancelled by a newer one.
#[derive(Clone, Debug)]
pub struct Debouncer {
    delay: Duration,
    latest: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Supersedes every pending call without waiting
    pub fn bump(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Waits for the quiet period; returns `false` if a newer call arrived
    pub async fn settle(&self) -> bool {
        let ticket = self.bump();

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let current = self.latest.load(Ordering::SeqCst);
        if current != ticket {
            tracing::debug!(ticket, current, "Generation request superseded");
            return false;
        }
        true
    }
}
