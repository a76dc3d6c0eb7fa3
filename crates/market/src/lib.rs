//! Tradebook Market
//!
//! The marketplace core of a peer-to-peer trading client: a local,
//! currency-scoped projection of the network order book that stays fresh
//! through dirty-flag polling, and routes per-offer actions by ownership
//! and registration state.
//!
//! ## Architecture
//!
//! ```text
//!   Ticker ──► DirtyFlagPoller ──► OfferNetwork::request_dirty_flag
//!                    ▲                          │
//!                    │   DirtyFlagNotification  │ (out of band)
//!                    └──────────────────────────┘
//!                    │ coalesced reload
//!                    ▼
//!              OfferStore::load ──► OrderBookProjection::recompute(filter)
//!                                              │
//!                         ┌────────────────────┴───────────────┐
//!                         ▼                                    ▼
//!                  ActionResolver                       VolumeCalculator
//!              (Remove / Take / setup redirect)      (amount x price text)
//! ```
//!
//! [`OrderBookSession`] holds all of the above as a synchronous state
//! machine. [`SessionDriver`] runs it on a single tokio task, performing the
//! network calls the session asks for and publishing [`OrderBookView`]s.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tradebook_market::{MarketConfig, OrderBookSession, SessionDriver, SessionWiring};
//!
//! let config = tradebook_market::config::load_default_config()?;
//! let session = OrderBookSession::new(&config, clock, setup);
//! let (handle, task) = SessionDriver::spawn(session, Direction::Buy, wiring, config.command_capacity);
//!
//! handle.set_amount_text("2").await?;
//! let view = handle.view();
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod poller;
pub mod projection;
pub mod registration;
pub mod resolver;
pub mod resources;
pub mod session;
pub mod store;
pub mod volume;

// Re-export main types
pub use config::{ConfigError, MarketConfig};
pub use driver::{SessionDriver, SessionHandle, SessionWiring};
pub use error::{Error, Result};
pub use poller::{DirtyFlagPoller, TickAction};
pub use projection::OrderBookProjection;
pub use registration::{IDENTITY_RECORD_KEY, RegistrationError, register};
pub use resolver::{ActionResolver, CreateOfferRequest, OfferAction, Resolution, TakeRequest};
pub use resources::country_flag_resource;
pub use session::{CreateOfferOutcome, OrderBookSession, OrderBookView, TickEffects};
pub use store::{LoadOutcome, LoadTicket, OfferStore};
pub use volume::{NumberLocale, Volume, VolumeCalculator, VolumeField, VolumeUpdate};
