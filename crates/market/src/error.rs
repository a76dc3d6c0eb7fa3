//! Marketplace errors

use thiserror::Error;
use tradebook_core::OfferId;
use tradebook_ports::NetworkError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Offer {offer_id} is not owned by the viewer")]
    NotOwner { offer_id: OfferId },

    #[error("Offer {0} cannot be taken by its own publisher")]
    OwnOffer(OfferId),

    #[error("Unknown offer: {0}")]
    OfferNotFound(OfferId),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Session is not active")]
    Inactive,

    #[error("Session closed")]
    SessionClosed,
}

pub type Result<T> = std::result::Result<T, Error>;
