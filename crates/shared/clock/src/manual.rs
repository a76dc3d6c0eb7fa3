use async_trait::async_trait;
use chrono::{Duration, Utc};
use log::debug;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tradebook_core::Timestamp;
use tradebook_ports::{Clock, Ticker};

/// Clock that only moves when told to
///
/// Cloning shares the underlying time, so a test can keep one handle and
/// give another to the component under test.
#[derive(Clone)]
pub struct ManualClock {
    current: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`, or at the current wall time if None
    pub fn new(start: Option<Timestamp>) -> Self {
        Self {
            current: Arc::new(Mutex::new(start.unwrap_or_else(Utc::now))),
        }
    }

    /// Move time forward
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += duration;
    }

    /// Jump to an explicit time
    pub fn set_time(&self, time: Timestamp) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = time;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Ticker fired by a [`TickHandle`]
pub struct ManualTicker {
    rx: mpsc::UnboundedReceiver<()>,
}

/// Test-side trigger for a [`ManualTicker`]
#[derive(Clone)]
pub struct TickHandle {
    tx: mpsc::UnboundedSender<()>,
}

impl ManualTicker {
    pub fn new() -> (Self, TickHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx }, TickHandle { tx })
    }
}

impl TickHandle {
    /// Fire one tick
    pub fn fire(&self) {
        if self.tx.send(()).is_err() {
            debug!("Tick fired after ticker was dropped");
        }
    }

    /// Fire `n` ticks
    pub fn fire_n(&self, n: usize) {
        for _ in 0..n {
            self.fire();
        }
    }
}

#[async_trait]
impl Ticker for ManualTicker {
    async fn tick(&mut self) {
        if self.rx.recv().await.is_none() {
            // Every handle is gone: no tick can ever arrive again
            std::future::pending::<()>().await;
        }
    }
}
