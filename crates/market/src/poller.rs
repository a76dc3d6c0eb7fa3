//! Dirty-flag polling
//!
//! The offer network does not push set-membership changes reliably, so the
//! session asks for a per-currency dirty flag once per period. Any
//! notification that comes back triggers a reload; notifications that
//! arrive while a reload is running collapse into one follow-up reload.

use log::{debug, trace};
use std::time::Duration;
use tradebook_core::{CurrencyCode, ViewerIdentity};
use tradebook_ports::DirtyFlagNotification;

/// What the owner of the poller must do for one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickAction {
    /// Issue `request_dirty_flag` for this currency
    pub query: CurrencyCode,
    /// Start a reload now (retry after a failed fetch)
    pub reload: bool,
}

/// Coalescing dirty-flag poller
///
/// Holds no timer itself; the session's injected ticker calls
/// [`DirtyFlagPoller::on_tick`] once per period.
#[derive(Debug, Clone)]
pub struct DirtyFlagPoller {
    period: Duration,
    running: bool,
    reload_in_flight: bool,
    reload_pending: bool,
    retry_on_tick: bool,
    ticks: u64,
}

impl DirtyFlagPoller {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            running: false,
            reload_in_flight: false,
            reload_pending: false,
            retry_on_tick: false,
            ticks: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn start(&mut self) {
        if !self.running {
            debug!("Dirty-flag polling started ({:?})", self.period);
        }
        self.running = true;
    }

    /// Stop polling; later ticks and notifications are ignored
    pub fn stop(&mut self) {
        if self.running {
            debug!("Dirty-flag polling stopped after {} ticks", self.ticks);
        }
        self.running = false;
        self.reload_in_flight = false;
        self.reload_pending = false;
        self.retry_on_tick = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_reload_in_flight(&self) -> bool {
        self.reload_in_flight
    }

    pub fn is_reload_pending(&self) -> bool {
        self.reload_pending
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Handle one period elapsing
    ///
    /// The query currency is read from `viewer` now, so an account switch
    /// between ticks is picked up by the very next tick.
    pub fn on_tick(
        &mut self,
        viewer: &ViewerIdentity,
        default_currency: &CurrencyCode,
    ) -> Option<TickAction> {
        if !self.running {
            return None;
        }
        self.ticks += 1;

        let reload = self.retry_on_tick && !self.reload_in_flight;
        if reload {
            self.retry_on_tick = false;
            self.reload_in_flight = true;
            debug!("Retrying reload after failed fetch");
        }

        let query = viewer.currency_scope(default_currency);
        trace!("Tick {}: dirty-flag query for {}", self.ticks, query);
        Some(TickAction { query, reload })
    }

    /// Handle a change notification; true means start a reload now
    pub fn on_notification(&mut self, notification: &DirtyFlagNotification) -> bool {
        if !self.running {
            debug!(
                "Ignoring dirty flag for {} after stop",
                notification.currency
            );
            return false;
        }
        debug!("Offer set for {} changed", notification.currency);
        self.request_reload()
    }

    /// Ask for a reload; true means start one now
    ///
    /// While a reload is running the request is remembered and folded into
    /// a single follow-up reload.
    pub fn request_reload(&mut self) -> bool {
        if !self.running {
            return false;
        }
        if self.reload_in_flight {
            if !self.reload_pending {
                debug!("Reload in flight; coalescing request");
            }
            self.reload_pending = true;
            return false;
        }
        // A fresh reload supersedes any armed retry
        self.retry_on_tick = false;
        self.reload_in_flight = true;
        true
    }

    /// Report the end of a reload; true means start the follow-up now
    pub fn reload_finished(&mut self, succeeded: bool) -> bool {
        self.reload_in_flight = false;
        if !self.running {
            return false;
        }
        if !succeeded {
            self.retry_on_tick = true;
        }
        if self.reload_pending {
            self.reload_pending = false;
            self.retry_on_tick = false;
            self.reload_in_flight = true;
            return true;
        }
        false
    }
}
