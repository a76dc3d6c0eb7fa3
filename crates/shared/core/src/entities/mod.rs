mod account;
mod direction;
mod filter;
mod list_item;
mod offer;
mod settings;

pub use account::{AccountId, BankAccountType, Country, IdentityKey, PaymentAccount, ViewerIdentity};
pub use direction::Direction;
pub use filter::OrderBookFilter;
pub use list_item::OrderBookListItem;
pub use offer::{Offer, OfferId, OfferParams};
pub use settings::TradingSettings;
