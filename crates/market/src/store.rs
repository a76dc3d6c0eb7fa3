//! Local Offer Snapshot
//!
//! Holds the currency-scoped set of offers last fetched from the network
//! and mediates every change to it. Reloads are split into
//! [`OfferStore::begin_load`] and [`OfferStore::complete_load`] so the
//! fetch itself can run wherever the caller likes; a completion is only
//! applied if its ticket is still the one in flight.

use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::sync::Arc;
use tradebook_core::{CurrencyCode, IdentityKey, Offer, OfferId, Timestamp};
use tradebook_ports::{Clock, NetworkError, NetworkResult, OfferNetwork};

use crate::error::{Error, Result};

/// Identifies one reload from start to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    id: u64,
    currency: CurrencyCode,
}

impl LoadTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Currency the reload is scoped to
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }
}

/// What a completed reload did to the snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Snapshot replaced; `changed` is false when the content was identical
    Applied { offers: usize, changed: bool },
    /// Collaborator had no data; snapshot is now empty
    Emptied,
    /// Fetch failed; snapshot left as it was
    Failed(NetworkError),
    /// Ticket superseded or store torn down; nothing applied
    Discarded,
}

/// Authoritative local snapshot of offers for one currency
pub struct OfferStore {
    offers: BTreeMap<OfferId, Arc<Offer>>,
    currency: Option<CurrencyCode>,
    active: bool,
    next_ticket: u64,
    in_flight: Option<u64>,
    version: u64,
    last_loaded_at: Option<Timestamp>,
    clock: Arc<dyn Clock>,
}

impl OfferStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            offers: BTreeMap::new(),
            currency: None,
            active: false,
            next_ticket: 0,
            in_flight: None,
            version: 0,
            last_loaded_at: None,
            clock,
        }
    }

    /// Prepare for a new viewing session
    ///
    /// Idempotent: calling it on an active store changes nothing.
    pub fn init(&mut self) {
        if self.active {
            return;
        }
        self.clear_snapshot();
        self.in_flight = None;
        self.active = true;
        debug!("Offer store initialised");
    }

    /// Tear down: forget the snapshot and any reload in flight
    ///
    /// Safe to call repeatedly. Completions arriving afterwards are discarded.
    pub fn cleanup(&mut self) {
        if !self.active && self.in_flight.is_none() && self.offers.is_empty() {
            return;
        }
        self.active = false;
        self.in_flight = None;
        self.clear_snapshot();
        debug!("Offer store cleaned up");
    }

    fn clear_snapshot(&mut self) {
        if !self.offers.is_empty() {
            self.offers.clear();
            self.version += 1;
        }
        self.currency = None;
        self.last_loaded_at = None;
    }

    /// Start a reload for `currency`, superseding any reload in flight
    pub fn begin_load(&mut self, currency: CurrencyCode) -> LoadTicket {
        self.next_ticket += 1;
        let ticket = LoadTicket {
            id: self.next_ticket,
            currency,
        };
        if let Some(previous) = self.in_flight.replace(ticket.id) {
            debug!("Reload {} superseded by {}", previous, ticket.id);
        }
        ticket
    }

    /// True when `ticket` is the reload in flight on an active store
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.active && self.in_flight == Some(ticket.id)
    }

    /// Apply the result of the fetch started with `ticket`
    pub fn complete_load(
        &mut self,
        ticket: &LoadTicket,
        result: NetworkResult<Option<Vec<Offer>>>,
    ) -> LoadOutcome {
        if !self.is_current(ticket) {
            debug!("Discarding stale reload {} ({})", ticket.id, ticket.currency);
            return LoadOutcome::Discarded;
        }
        self.in_flight = None;

        let fetched = match result {
            Ok(Some(offers)) => offers,
            Ok(None) => {
                info!("No offers available for {}", ticket.currency);
                self.replace_snapshot(ticket.currency.clone(), BTreeMap::new());
                return LoadOutcome::Emptied;
            }
            Err(e) => {
                warn!("Reload {} for {} failed: {}", ticket.id, ticket.currency, e);
                return LoadOutcome::Failed(e);
            }
        };

        let mut offers = BTreeMap::new();
        for offer in fetched {
            if offer.currency() != &ticket.currency {
                warn!(
                    "Ignoring offer {} in {} while scoped to {}",
                    offer.id(),
                    offer.currency(),
                    ticket.currency
                );
                continue;
            }
            if let Some(duplicate) = offers.insert(offer.id().clone(), Arc::new(offer)) {
                debug!("Duplicate offer id {}; keeping the later copy", duplicate.id());
            }
        }

        let count = offers.len();
        let changed = self.replace_snapshot(ticket.currency.clone(), offers);
        debug!(
            "Reload {} applied: {} offers for {} (changed: {})",
            ticket.id, count, ticket.currency, changed
        );
        LoadOutcome::Applied {
            offers: count,
            changed,
        }
    }

    fn replace_snapshot(
        &mut self,
        currency: CurrencyCode,
        offers: BTreeMap<OfferId, Arc<Offer>>,
    ) -> bool {
        let changed = self.offers != offers || self.currency.as_ref() != Some(&currency);
        if changed {
            self.offers = offers;
            self.version += 1;
        }
        self.currency = Some(currency);
        self.last_loaded_at = Some(self.clock.now());
        changed
    }

    /// Fetch and apply a fresh snapshot in one step
    pub async fn load_offers(
        &mut self,
        network: &dyn OfferNetwork,
        currency: CurrencyCode,
    ) -> LoadOutcome {
        let ticket = self.begin_load(currency);
        let result = network.fetch_offers(ticket.currency()).await;
        self.complete_load(&ticket, result)
    }

    /// Check that `owner` may remove the offer, without changing anything
    pub fn check_removal(&self, offer_id: &OfferId, owner: &IdentityKey) -> Result<Arc<Offer>> {
        let offer = self
            .offers
            .get(offer_id)
            .ok_or_else(|| Error::OfferNotFound(offer_id.clone()))?;
        if offer.owner() != owner {
            return Err(Error::NotOwner {
                offer_id: offer_id.clone(),
            });
        }
        Ok(offer.clone())
    }

    /// Remove an offer published by `owner`
    ///
    /// Rejected with [`Error::NotOwner`] if someone else published it; the
    /// snapshot is left untouched in that case.
    pub fn remove_offer(&mut self, offer_id: &OfferId, owner: &IdentityKey) -> Result<Arc<Offer>> {
        if let Err(e) = self.check_removal(offer_id, owner) {
            warn!("Removal of {} rejected: {}", offer_id, e);
            return Err(e);
        }
        let removed = self
            .offers
            .remove(offer_id)
            .ok_or_else(|| Error::OfferNotFound(offer_id.clone()))?;
        self.version += 1;
        info!("Removed own offer {}", offer_id);
        Ok(removed)
    }

    pub fn get(&self, offer_id: &OfferId) -> Option<&Arc<Offer>> {
        self.offers.get(offer_id)
    }

    pub fn offers(&self) -> impl Iterator<Item = &Arc<Offer>> {
        self.offers.values()
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Currency of the current snapshot, None before the first load
    pub fn currency(&self) -> Option<&CurrencyCode> {
        self.currency.as_ref()
    }

    /// Bumped on every change of content
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn last_loaded_at(&self) -> Option<Timestamp> {
        self.last_loaded_at
    }
}
