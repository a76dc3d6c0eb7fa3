use async_trait::async_trait;
use tradebook_core::{CurrencyCode, Offer, OfferId};

use crate::error::NetworkResult;

/// Out-of-band answer to a dirty-flag query
///
/// Delivered through the channel the collaborator was handed, never as the
/// return value of [`OfferNetwork::request_dirty_flag`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirtyFlagNotification {
    /// Currency the answering query was scoped to
    pub currency: CurrencyCode,
}

impl DirtyFlagNotification {
    pub fn new(currency: CurrencyCode) -> Self {
        Self { currency }
    }
}

/// Port for the peer-to-peer offer network
#[async_trait]
pub trait OfferNetwork: Send + Sync {
    /// Ask whether the offer set for `currency` changed
    ///
    /// Non-blocking. A change is reported later as a
    /// [`DirtyFlagNotification`]; no change produces no notification.
    fn request_dirty_flag(&self, currency: &CurrencyCode);

    /// Fetch every offer published for `currency`
    ///
    /// `Ok(None)` means the network holds no data for the currency.
    async fn fetch_offers(&self, currency: &CurrencyCode) -> NetworkResult<Option<Vec<Offer>>>;

    /// Withdraw an offer this peer published
    async fn remove_offer(&self, offer_id: &OfferId) -> NetworkResult<()>;
}
