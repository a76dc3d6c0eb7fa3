use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior};
use tradebook_ports::Ticker;

/// Fixed-period ticker backed by a tokio interval
///
/// Missed ticks are skipped rather than bursted, so a stalled session
/// resumes with a single tick instead of a backlog.
pub struct IntervalTicker {
    interval: Interval,
    period: Duration,
}

impl IntervalTicker {
    /// Create a ticker; the first tick fires one full period from now
    pub fn new(period: Duration) -> Self {
        let start = tokio::time::Instant::now() + period;
        let mut interval = tokio::time::interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval, period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}
