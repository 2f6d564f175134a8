//! Fixed-interval pacing between sequential vendor calls

use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Keeps at least `interval` between the end of one call and the start of the next.
/// The first call is never delayed and nothing waits after the last one.
pub struct Pacer {
    interval: Duration,
    next_slot: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: None,
        }
    }

    /// Wait for the next free slot.
    pub async fn ready(&mut self) {
        if let Some(slot) = self.next_slot {
            sleep_until(slot).await;
        }
    }

    /// Record that a call just finished.
    pub fn complete(&mut self) {
        self.next_slot = Some(Instant::now() + self.interval);
    }
}
