use tradebook_core::Timestamp;

/// Wall-clock source for snapshot bookkeeping
///
/// The offer store stamps each applied load with [`Clock::now`]. Polling
/// cadence is not driven from here; see [`crate::Ticker`].
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
