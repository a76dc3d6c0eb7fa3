//! Action routing
//!
//! Decides what the viewer may do with an offer, or with the create-offer
//! button, as a pure function of the offer, the viewer's identity and
//! registration, and their settings. Nothing here performs the action.

use std::sync::Arc;
use tradebook_core::{
    Amount, Direction, Offer, OrderBookFilter, PaymentAccount, TradingSettings, ViewerIdentity,
};
use tradebook_ports::SetupReason;

/// Either go ahead, or send the viewer to account setup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    Proceed(T),
    Redirect(SetupReason),
}

impl<T> Resolution<T> {
    pub fn is_redirect(&self) -> bool {
        matches!(self, Resolution::Redirect(_))
    }
}

/// Everything the take-offer flow needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakeRequest {
    pub offer: Arc<Offer>,
    pub requested_amount: Amount,
    /// Side the viewer trades on: a SELL offer is taken by buying
    pub viewer_direction: Direction,
}

/// Everything the create-offer flow needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOfferRequest {
    pub filter: OrderBookFilter,
    pub account: PaymentAccount,
}

/// Action available on one offer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferAction {
    /// The viewer published it
    Remove,
    Take(TakeRequest),
}

pub struct ActionResolver;

impl ActionResolver {
    /// Action offered for `offer`, ignoring registration
    ///
    /// The requested amount is whatever the viewer entered, even zero, and
    /// the full published amount only while the amount field is empty.
    /// Bounds are checked by the take-offer flow.
    pub fn offer_action(
        offer: &Arc<Offer>,
        viewer: &ViewerIdentity,
        entered_amount: Option<Amount>,
    ) -> OfferAction {
        if viewer.owns(offer) {
            return OfferAction::Remove;
        }
        let requested_amount = entered_amount.unwrap_or_else(|| offer.amount());
        OfferAction::Take(TakeRequest {
            offer: offer.clone(),
            requested_amount,
            viewer_direction: offer.direction().opposite(),
        })
    }

    /// Action for `offer`, gated on registration for takes
    pub fn resolve(
        offer: &Arc<Offer>,
        viewer: &ViewerIdentity,
        entered_amount: Option<Amount>,
    ) -> Resolution<OfferAction> {
        match Self::offer_action(offer, viewer, entered_amount) {
            OfferAction::Remove => Resolution::Proceed(OfferAction::Remove),
            take @ OfferAction::Take(_) => match Self::check_registered(viewer) {
                Ok(()) => Resolution::Proceed(take),
                Err(reason) => Resolution::Redirect(reason),
            },
        }
    }

    /// Whether the viewer may create an offer with `filter`
    pub fn create(
        viewer: &ViewerIdentity,
        settings: &TradingSettings,
        filter: &OrderBookFilter,
    ) -> Resolution<CreateOfferRequest> {
        if let Err(reason) = Self::check_registered(viewer) {
            return Resolution::Redirect(reason);
        }
        match (&viewer.selected_account, settings.is_complete()) {
            (Some(account), true) => Resolution::Proceed(CreateOfferRequest {
                filter: filter.clone(),
                account: account.clone(),
            }),
            _ => Resolution::Redirect(SetupReason::SettingsIncomplete),
        }
    }

    pub fn check_registered(viewer: &ViewerIdentity) -> Result<(), SetupReason> {
        if viewer.is_registered() {
            Ok(())
        } else {
            Err(SetupReason::Unregistered)
        }
    }
}
