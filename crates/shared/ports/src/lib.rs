//! Tradebook Ports
//!
//! Port definitions (traits) for the collaborators the marketplace core
//! talks to. These define the boundaries between session logic and the
//! network, wallet, persistence and presentation layers.

mod clock;
mod error;
mod network;
mod persistence;
mod resources;
mod setup;
mod ticker;
mod wallet;

pub use clock::Clock;
pub use error::{NetworkError, NetworkResult, PersistenceError, WalletError};
pub use network::{DirtyFlagNotification, OfferNetwork};
pub use persistence::Persistence;
pub use resources::ResourceLookup;
pub use setup::{AccountSetup, SetupReason};
pub use ticker::Ticker;
pub use wallet::{RegistrationWallet, TransactionId};
