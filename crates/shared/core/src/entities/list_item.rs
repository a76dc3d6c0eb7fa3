use std::sync::Arc;

use super::{Offer, OfferId};
use crate::values::Price;

/// Row of the order book projection
///
/// Carries no data beyond the offer itself; it gives sort and filter
/// passes a stable, cheaply clonable handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBookListItem {
    offer: Arc<Offer>,
}

impl OrderBookListItem {
    pub fn new(offer: Arc<Offer>) -> Self {
        Self { offer }
    }

    pub fn offer(&self) -> &Arc<Offer> {
        &self.offer
    }

    pub fn id(&self) -> &OfferId {
        self.offer.id()
    }

    pub fn price(&self) -> Price {
        self.offer.price()
    }
}
