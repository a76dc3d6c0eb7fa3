use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::{BankAccountType, Country, Direction, IdentityKey};
use crate::error::OfferError;
use crate::values::{Amount, CurrencyCode, Price};

/// Unique identifier for an offer
///
/// Ordered lexicographically; the projection uses this order to break
/// price ties deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(String);

impl OfferId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OfferId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Everything needed to publish an offer
///
/// Also the wire shape of an offer: decoding goes through [`Offer::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferParams {
    pub id: OfferId,
    pub direction: Direction,
    pub price: Price,
    pub amount: Amount,
    pub currency: CurrencyCode,
    pub owner: IdentityKey,
    pub bank_account_type: BankAccountType,
    pub bank_account_country: Country,
    pub max_trade_period: Duration,
}

/// A published intent to trade a fixed amount at a fixed price
///
/// Offers are immutable once built. An update is modelled as a removal
/// followed by a new publication, so fields are only exposed read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OfferParams")]
pub struct Offer {
    id: OfferId,
    direction: Direction,
    price: Price,
    amount: Amount,
    currency: CurrencyCode,
    owner: IdentityKey,
    bank_account_type: BankAccountType,
    bank_account_country: Country,
    max_trade_period: Duration,
}

impl Offer {
    /// Validate and build an offer
    pub fn new(params: OfferParams) -> Result<Self, OfferError> {
        if params.id.as_str().is_empty() {
            return Err(OfferError::EmptyId);
        }
        if params.price <= Decimal::ZERO {
            return Err(OfferError::NonPositivePrice(params.price.to_string()));
        }
        if params.amount <= Decimal::ZERO {
            return Err(OfferError::NonPositiveAmount(params.amount.to_string()));
        }

        Ok(Self {
            id: params.id,
            direction: params.direction,
            price: params.price,
            amount: params.amount,
            currency: params.currency,
            owner: params.owner,
            bank_account_type: params.bank_account_type,
            bank_account_country: params.bank_account_country,
            max_trade_period: params.max_trade_period,
        })
    }

    pub fn id(&self) -> &OfferId {
        &self.id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Identity key of the publishing peer
    pub fn owner(&self) -> &IdentityKey {
        &self.owner
    }

    pub fn bank_account_type(&self) -> &BankAccountType {
        &self.bank_account_type
    }

    pub fn bank_account_country(&self) -> &Country {
        &self.bank_account_country
    }

    pub fn max_trade_period(&self) -> Duration {
        self.max_trade_period
    }
}

impl TryFrom<OfferParams> for Offer {
    type Error = OfferError;

    fn try_from(params: OfferParams) -> Result<Self, Self::Error> {
        Self::new(params)
    }
}
