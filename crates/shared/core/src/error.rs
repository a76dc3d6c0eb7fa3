use thiserror::Error;

/// Validation errors raised when constructing value types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OfferError {
    #[error("Offer price must be positive, got {0}")]
    NonPositivePrice(String),

    #[error("Offer amount must be positive, got {0}")]
    NonPositiveAmount(String),

    #[error("Offer identifier must not be empty")]
    EmptyId,
}
