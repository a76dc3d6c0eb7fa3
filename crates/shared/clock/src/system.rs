use chrono::Utc;
use tradebook_core::Timestamp;
use tradebook_ports::Clock;

/// UTC wall clock used by live sessions
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}
