//! Tradebook Core Domain
//!
//! Immutable value types shared by every marketplace component.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod error;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    // Viewer context
    AccountId,
    BankAccountType,
    Country,
    // Offers
    Direction,
    IdentityKey,
    Offer,
    OfferId,
    OfferParams,
    // Projection
    OrderBookFilter,
    OrderBookListItem,
    PaymentAccount,
    TradingSettings,
    ViewerIdentity,
};
pub use error::OfferError;
pub use values::{Amount, CurrencyCode, Price, Timestamp};
