//! Minimum spacing between chunk emissions.

use std::time::Duration;
use tokio::time::Instant;

/// Tracks when the last chunk left and how long to hold the next one.
///
/// One pacer belongs to one segmenter; never share it across streams.
#[derive(Debug)]
pub struct ChunkPacer {
    last_emit: Instant,
    min_gap: Duration,
    target_gap: Duration,
}

impl ChunkPacer {
    pub const DEFAULT_MIN_GAP: Duration = Duration::from_millis(150);
    pub const DEFAULT_TARGET_GAP: Duration = Duration::from_millis(300);

    /// Starts the clock now.
    pub fn new(min_gap: Duration, target_gap: Duration) -> Self {
        Self {
            last_emit: Instant::now(),
            min_gap,
            target_gap: target_gap.max(min_gap),
        }
    }

    pub fn last_emit(&self) -> Instant {
        self.last_emit
    }

    /// `max(min_gap, target_gap - elapsed)`.
    pub fn delay_for(&self, elapsed: Duration) -> Duration {
        self.min_gap.max(self.target_gap.saturating_sub(elapsed))
    }

    /// How long to suspend before emitting at `now`. Zero once `elapsed`
    /// has reached the computed delay.
    pub fn wait_before(&self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.last_emit);
        let delay = self.delay_for(elapsed);
        if elapsed < delay {
            delay - elapsed
        } else {
            Duration::ZERO
        }
    }

    /// Suspends for the remaining delay, then records the emission time.
    pub async fn pace(&mut self) {
        let wait = self.wait_before(Instant::now());
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        self.last_emit = Instant::now();
    }
}

impl Default for ChunkPacer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_GAP, Self::DEFAULT_TARGET_GAP)
    }
}
