//! Tradebook Clock Infrastructure
//!
//! Time sources and poll tickers injected into a session:
//!
//! ```text
//! Clock  (point in time)     Ticker (periodic signal)
//!   ├── SystemClock            ├── IntervalTicker  (tokio interval)
//!   └── ManualClock            └── ManualTicker    (fired by TickHandle)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use tradebook_clock::{IntervalTicker, ManualTicker};
//! use std::time::Duration;
//!
//! // Production: poll once per second
//! let ticker = IntervalTicker::new(Duration::from_millis(1000));
//!
//! // Tests: fire ticks explicitly
//! let (ticker, ticks) = ManualTicker::new();
//! ticks.fire();
//! ```

mod interval;
mod manual;
mod system;

pub use interval::IntervalTicker;
pub use manual::{ManualClock, ManualTicker, TickHandle};
pub use system::SystemClock;

// Re-export the port traits for convenience
pub use tradebook_ports::{Clock, Ticker};
