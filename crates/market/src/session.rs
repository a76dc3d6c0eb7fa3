//! Order book session
//!
//! Owns every piece of per-screen state (snapshot, poller, filter,
//! projection, volume inputs) and wires them together without doing any
//! I/O. Each event handler returns the network work it needs, as a
//! [`LoadTicket`] or a dirty-flag currency, and the caller performs it and
//! feeds the result back in. Viewer identity and settings are passed into
//! every call rather than held.

use log::{debug, info, warn};
use std::sync::Arc;
use tradebook_core::{
    CurrencyCode, Direction, Offer, OfferId, OrderBookFilter, OrderBookListItem, TradingSettings,
    ViewerIdentity,
};
use tradebook_clock::SystemClock;
use tradebook_ports::{AccountSetup, Clock, DirtyFlagNotification, NetworkResult, SetupReason};

use crate::config::MarketConfig;
use crate::error::{Error, Result};
use crate::poller::DirtyFlagPoller;
use crate::projection::OrderBookProjection;
use crate::resolver::{ActionResolver, CreateOfferRequest, OfferAction, Resolution, TakeRequest};
use crate::store::{LoadOutcome, LoadTicket, OfferStore};
use crate::volume::{Volume, VolumeCalculator, VolumeUpdate};

/// Network work requested by one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickEffects {
    pub dirty_query: Option<CurrencyCode>,
    pub reload: Option<LoadTicket>,
}

/// Result of pressing "create offer"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOfferOutcome {
    Opened(CreateOfferRequest),
    /// A create flow is already open; nothing happened
    AlreadyOpen,
    Redirected(SetupReason),
}

/// Everything a presentation layer needs to draw the screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBookView {
    pub direction: Direction,
    pub currency: Option<CurrencyCode>,
    pub items: Vec<OrderBookListItem>,
    pub amount_text: String,
    pub price_text: String,
    pub volume: Volume,
    /// No counter-offers: creating one is the natural next step
    pub suggest_create_offer: bool,
    pub create_offer_open: bool,
    pub loading: bool,
    pub snapshot_version: u64,
}

pub struct OrderBookSession {
    default_currency: CurrencyCode,
    store: OfferStore,
    poller: DirtyFlagPoller,
    projection: OrderBookProjection,
    filter: OrderBookFilter,
    volume: VolumeCalculator,
    setup: Arc<dyn AccountSetup>,
    active: bool,
    create_offer_open: bool,
}

impl OrderBookSession {
    pub fn new(config: &MarketConfig, clock: Arc<dyn Clock>, setup: Arc<dyn AccountSetup>) -> Self {
        Self {
            default_currency: config.default_currency.clone(),
            store: OfferStore::new(clock),
            poller: DirtyFlagPoller::new(config.poll_interval()),
            projection: OrderBookProjection::new(),
            filter: OrderBookFilter::new(Direction::Buy),
            volume: VolumeCalculator::new(config.number_locale, config.default_currency.clone()),
            setup,
            active: false,
            create_offer_open: false,
        }
    }

    /// Session stamped by the system clock
    pub fn live(config: &MarketConfig, setup: Arc<dyn AccountSetup>) -> Self {
        Self::new(config, Arc::new(SystemClock), setup)
    }

    // === Lifecycle ===

    /// Open the screen for `direction` and request the initial load
    pub fn activate(&mut self, direction: Direction, viewer: &ViewerIdentity) -> Option<LoadTicket> {
        self.store.init();
        self.poller.start();
        self.active = true;

        let scope = self.scope(viewer);
        self.volume.set_price_text("");
        self.volume.set_currency(scope);
        self.sync_filter_inputs();
        self.filter.set_direction(direction);
        self.recompute();
        info!("Order book session active ({} side)", direction);

        self.start_reload(viewer)
    }

    /// Close the screen; anything arriving afterwards is discarded
    pub fn deactivate(&mut self) {
        if self.active {
            info!("Order book session closed");
        }
        self.store.cleanup();
        self.poller.stop();
        self.projection.clear();
        self.active = false;
        self.create_offer_open = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    // === Synchronisation ===

    pub fn on_tick(&mut self, viewer: &ViewerIdentity) -> TickEffects {
        if !self.active {
            return TickEffects::default();
        }
        match self.poller.on_tick(viewer, &self.default_currency) {
            Some(action) => TickEffects {
                reload: action
                    .reload
                    .then(|| self.store.begin_load(action.query.clone())),
                dirty_query: Some(action.query),
            },
            None => TickEffects::default(),
        }
    }

    pub fn on_dirty_flag(
        &mut self,
        notification: &DirtyFlagNotification,
        viewer: &ViewerIdentity,
    ) -> Option<LoadTicket> {
        if !self.active {
            debug!("Dirty flag for {} after close", notification.currency);
            return None;
        }
        if self.poller.on_notification(notification) {
            let scope = self.scope(viewer);
            Some(self.store.begin_load(scope))
        } else {
            None
        }
    }

    /// Apply a finished fetch and recompute the projection
    ///
    /// Returns the follow-up reload when requests were coalesced meanwhile,
    /// or when the viewer switched currency while this one was running.
    pub fn on_offers_loaded(
        &mut self,
        ticket: &LoadTicket,
        result: NetworkResult<Option<Vec<Offer>>>,
        viewer: &ViewerIdentity,
    ) -> Option<LoadTicket> {
        let scope = self.scope(viewer);
        if self.store.is_current(ticket) && ticket.currency() != &scope {
            info!(
                "Dropping {} offers; viewer now trades {}",
                ticket.currency(),
                scope
            );
            return Some(self.store.begin_load(scope));
        }

        let succeeded = match self.store.complete_load(ticket, result) {
            LoadOutcome::Discarded => return None,
            LoadOutcome::Failed(_) => false,
            LoadOutcome::Applied { .. } | LoadOutcome::Emptied => true,
        };
        self.recompute();

        if self.poller.reload_finished(succeeded) {
            Some(self.store.begin_load(scope))
        } else {
            None
        }
    }

    /// The viewer selected another payment account
    pub fn on_account_changed(&mut self, viewer: &ViewerIdentity) -> Option<LoadTicket> {
        let scope = self.scope(viewer);
        self.volume.set_currency(scope);
        if !self.active {
            return None;
        }
        self.start_reload(viewer)
    }

    // === Filter and inputs ===

    /// Change the viewer's direction
    ///
    /// The projection is recomputed on the current snapshot right away and
    /// a full reload is requested, since the other side may not be loaded.
    pub fn set_direction(&mut self, direction: Direction, viewer: &ViewerIdentity) -> Option<LoadTicket> {
        if !self.filter.set_direction(direction) {
            return None;
        }
        self.recompute();
        if self.active {
            self.start_reload(viewer)
        } else {
            None
        }
    }

    pub fn set_amount_text(&mut self, text: &str) -> VolumeUpdate {
        let update = self.volume.set_amount_text(text);
        self.sync_filter_inputs();
        update
    }

    pub fn set_price_text(&mut self, text: &str) -> VolumeUpdate {
        let update = self.volume.set_price_text(text);
        self.sync_filter_inputs();
        update
    }

    fn sync_filter_inputs(&mut self) {
        self.filter.set_amount(self.volume.entered_amount());
        self.filter.set_price(self.volume.entered_price());
    }

    // === Actions ===

    /// Action shown for an offer in the projection
    pub fn offer_action(&self, offer_id: &OfferId, viewer: &ViewerIdentity) -> Result<OfferAction> {
        let offer = self.offer(offer_id)?;
        Ok(ActionResolver::offer_action(
            offer,
            viewer,
            self.volume.entered_amount(),
        ))
    }

    /// Take someone else's offer, or redirect an unregistered viewer
    pub fn take_offer(
        &self,
        offer_id: &OfferId,
        viewer: &ViewerIdentity,
    ) -> Result<Resolution<TakeRequest>> {
        self.ensure_active()?;
        let offer = self.offer(offer_id)?;
        match ActionResolver::resolve(offer, viewer, self.volume.entered_amount()) {
            Resolution::Proceed(OfferAction::Take(take)) => {
                info!(
                    "Taking offer {} for {} ({})",
                    offer_id, take.requested_amount, take.viewer_direction
                );
                Ok(Resolution::Proceed(take))
            }
            Resolution::Proceed(OfferAction::Remove) => Err(Error::OwnOffer(offer_id.clone())),
            Resolution::Redirect(reason) => {
                self.redirect(reason);
                Ok(Resolution::Redirect(reason))
            }
        }
    }

    /// Check a removal before asking the network to withdraw the offer
    pub fn prepare_removal(&self, offer_id: &OfferId, viewer: &ViewerIdentity) -> Result<Arc<Offer>> {
        self.ensure_active()?;
        let offer = self.offer(offer_id)?;
        match ActionResolver::offer_action(offer, viewer, None) {
            OfferAction::Remove => Ok(offer.clone()),
            OfferAction::Take(_) => {
                warn!("Viewer tried to remove offer {} they do not own", offer_id);
                Err(Error::NotOwner {
                    offer_id: offer_id.clone(),
                })
            }
        }
    }

    /// Drop the offer locally once the network confirmed the withdrawal
    pub fn complete_removal(
        &mut self,
        offer_id: &OfferId,
        viewer: &ViewerIdentity,
        result: NetworkResult<()>,
    ) -> Result<Arc<Offer>> {
        self.ensure_active()?;
        if let Err(e) = result {
            warn!("Network refused removal of {}: {}", offer_id, e);
            return Err(e.into());
        }
        let removed = self.store.remove_offer(offer_id, &viewer.public_key)?;
        self.recompute();
        Ok(removed)
    }

    pub fn create_offer(
        &mut self,
        viewer: &ViewerIdentity,
        settings: &TradingSettings,
    ) -> CreateOfferOutcome {
        if self.create_offer_open {
            debug!("Create offer already open");
            return CreateOfferOutcome::AlreadyOpen;
        }
        match ActionResolver::create(viewer, settings, &self.filter) {
            Resolution::Proceed(request) => {
                self.create_offer_open = true;
                CreateOfferOutcome::Opened(request)
            }
            Resolution::Redirect(reason) => {
                self.redirect(reason);
                CreateOfferOutcome::Redirected(reason)
            }
        }
    }

    /// The create-offer flow was closed; creating is possible again
    pub fn create_offer_closed(&mut self) {
        self.create_offer_open = false;
    }

    // === Accessors ===

    pub fn view(&self) -> OrderBookView {
        OrderBookView {
            direction: self.filter.direction(),
            currency: self.store.currency().cloned(),
            items: self.projection.items().to_vec(),
            amount_text: self.volume.amount_text().to_string(),
            price_text: self.volume.price_text().to_string(),
            volume: self.volume.volume().clone(),
            suggest_create_offer: self.projection.is_empty(),
            create_offer_open: self.create_offer_open,
            loading: self.store.is_loading(),
            snapshot_version: self.projection.snapshot_version(),
        }
    }

    pub fn store(&self) -> &OfferStore {
        &self.store
    }

    pub fn poller(&self) -> &DirtyFlagPoller {
        &self.poller
    }

    pub fn projection(&self) -> &OrderBookProjection {
        &self.projection
    }

    pub fn filter(&self) -> &OrderBookFilter {
        &self.filter
    }

    pub fn volume(&self) -> &Volume {
        self.volume.volume()
    }

    // === Internals ===

    fn scope(&self, viewer: &ViewerIdentity) -> CurrencyCode {
        viewer.currency_scope(&self.default_currency)
    }

    fn start_reload(&mut self, viewer: &ViewerIdentity) -> Option<LoadTicket> {
        if self.poller.request_reload() {
            let scope = self.scope(viewer);
            Some(self.store.begin_load(scope))
        } else {
            None
        }
    }

    fn recompute(&mut self) {
        self.projection.recompute(&self.store, &self.filter);
    }

    fn offer(&self, offer_id: &OfferId) -> Result<&Arc<Offer>> {
        self.store
            .get(offer_id)
            .ok_or_else(|| Error::OfferNotFound(offer_id.clone()))
    }

    fn ensure_active(&self) -> Result<()> {
        if self.active { Ok(()) } else { Err(Error::Inactive) }
    }

    fn redirect(&self, reason: SetupReason) {
        info!("Sending viewer to account setup: {}", reason);
        self.setup.open_account_setup(reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::{offer, offer_in};
    use rust_decimal_macros::dec;
    use std::sync::Mutex;
    use tradebook_clock::ManualClock;
    use tradebook_core::{AccountId, BankAccountType, Country, IdentityKey, PaymentAccount};
    use tradebook_ports::NetworkError;

    #[derive(Default)]
    struct RecordingSetup {
        redirects: Mutex<Vec<SetupReason>>,
    }

    impl AccountSetup for RecordingSetup {
        fn open_account_setup(&self, reason: SetupReason) {
            self.redirects.lock().unwrap().push(reason);
        }
    }

    fn session() -> (OrderBookSession, Arc<RecordingSetup>) {
        let setup = Arc::new(RecordingSetup::default());
        let session = OrderBookSession::new(
            &MarketConfig::default(),
            Arc::new(ManualClock::new(None)),
            setup.clone(),
        );
        (session, setup)
    }

    fn account(currency: &str) -> PaymentAccount {
        PaymentAccount {
            id: format!("acc-{currency}"),
            currency: CurrencyCode::new(currency),
            account_type: BankAccountType::Sepa,
            country: Country::new("DE", "Germany"),
        }
    }

    fn viewer() -> ViewerIdentity {
        ViewerIdentity::new(IdentityKey::new("me"))
    }

    fn registered() -> ViewerIdentity {
        viewer()
            .with_account_id(AccountId::new("acc-id"))
            .with_selected_account(account("EUR"))
    }

    fn book() -> Vec<Offer> {
        vec![
            offer("s2", Direction::Sell, dec!(101), "peer"),
            offer("s1", Direction::Sell, dec!(100), "peer"),
            offer("b1", Direction::Buy, dec!(99), "peer"),
            offer("mine", Direction::Sell, dec!(105), "me"),
        ]
    }

    fn active_with_book(viewer: &ViewerIdentity) -> (OrderBookSession, Arc<RecordingSetup>) {
        let (mut session, setup) = session();
        let ticket = session.activate(Direction::Buy, viewer).unwrap();
        assert!(session.on_offers_loaded(&ticket, Ok(Some(book())), viewer).is_none());
        (session, setup)
    }

    fn projected_ids(session: &OrderBookSession) -> Vec<String> {
        session
            .projection()
            .items()
            .iter()
            .map(|item| item.id().to_string())
            .collect()
    }

    #[test]
    fn test_activation_loads_and_projects() {
        let (session, _) = active_with_book(&viewer());
        assert_eq!(projected_ids(&session), vec!["s1", "s2", "mine"]);
        let view = session.view();
        assert_eq!(view.currency, Some(CurrencyCode::new("EUR")));
        assert!(!view.suggest_create_offer);
        assert!(!view.loading);
    }

    #[test]
    fn test_tick_queries_current_currency() {
        let (mut session, _) = session();
        let mut viewer = viewer();
        session.activate(Direction::Buy, &viewer);

        let effects = session.on_tick(&viewer);
        assert_eq!(effects.dirty_query, Some(CurrencyCode::new("EUR")));

        viewer = viewer.with_selected_account(account("USD"));
        let effects = session.on_tick(&viewer);
        assert_eq!(effects.dirty_query, Some(CurrencyCode::new("USD")));
    }

    #[test]
    fn test_notifications_during_reload_coalesce() {
        let (mut session, _) = active_with_book(&viewer());
        let v = viewer();
        let n = DirtyFlagNotification::new(CurrencyCode::new("EUR"));

        let first = session.on_dirty_flag(&n, &v).unwrap();
        for _ in 0..4 {
            assert!(session.on_dirty_flag(&n, &v).is_none());
        }

        let follow_up = session
            .on_offers_loaded(&first, Ok(Some(book())), &v)
            .expect("one follow-up reload");
        assert!(session.on_offers_loaded(&follow_up, Ok(Some(book())), &v).is_none());
    }

    #[test]
    fn test_direction_change_applies_to_newest_snapshot() {
        let (mut session, _) = active_with_book(&viewer());
        let v = viewer();
        let n = DirtyFlagNotification::new(CurrencyCode::new("EUR"));
        let in_flight = session.on_dirty_flag(&n, &v).unwrap();

        // Filter changes while the reload runs: recomputed on the old snapshot now
        assert!(session.set_direction(Direction::Sell, &v).is_none());
        assert_eq!(projected_ids(&session), vec!["b1"]);

        // The newer snapshot is projected with the newer filter
        let newer = vec![
            offer("b1", Direction::Buy, dec!(99), "peer"),
            offer("b2", Direction::Buy, dec!(103), "peer"),
        ];
        let follow_up = session.on_offers_loaded(&in_flight, Ok(Some(newer)), &v);
        assert_eq!(projected_ids(&session), vec!["b2", "b1"]);
        assert_eq!(session.projection().snapshot_version(), session.store().version());

        // The coalesced direction-change reload still runs
        assert!(follow_up.is_some());
    }

    #[test]
    fn test_unchanged_direction_requests_nothing() {
        let (mut session, _) = active_with_book(&viewer());
        assert!(session.set_direction(Direction::Buy, &viewer()).is_none());
        assert!(!session.poller().is_reload_in_flight());
    }

    #[test]
    fn test_failed_fetch_retries_on_next_tick() {
        let (mut session, _) = active_with_book(&viewer());
        let v = viewer();
        let n = DirtyFlagNotification::new(CurrencyCode::new("EUR"));
        let ticket = session.on_dirty_flag(&n, &v).unwrap();

        let err = NetworkError::Unavailable("offline".to_string());
        assert!(session.on_offers_loaded(&ticket, Err(err), &v).is_none());
        assert_eq!(session.projection().len(), 3);

        let effects = session.on_tick(&v);
        assert!(effects.reload.is_some());
    }

    #[test]
    fn test_no_data_empties_projection() {
        let (mut session, _) = active_with_book(&viewer());
        let v = viewer();
        let n = DirtyFlagNotification::new(CurrencyCode::new("EUR"));
        let ticket = session.on_dirty_flag(&n, &v).unwrap();
        session.on_offers_loaded(&ticket, Ok(None), &v);
        assert!(session.view().suggest_create_offer);
    }

    #[test]
    fn test_currency_switch_mid_reload_restarts() {
        let (mut session, _) = active_with_book(&viewer());
        let eur_viewer = viewer();
        let n = DirtyFlagNotification::new(CurrencyCode::new("EUR"));
        let eur_ticket = session.on_dirty_flag(&n, &eur_viewer).unwrap();

        let usd_viewer = viewer().with_selected_account(account("USD"));
        let usd_ticket = session
            .on_offers_loaded(&eur_ticket, Ok(Some(book())), &usd_viewer)
            .expect("restart for new currency");
        assert_eq!(usd_ticket.currency().as_str(), "USD");

        let usd_offers = vec![offer_in("u1", Direction::Sell, dec!(110), "peer", "USD")];
        session.on_offers_loaded(&usd_ticket, Ok(Some(usd_offers)), &usd_viewer);
        assert_eq!(projected_ids(&session), vec!["u1"]);
        assert_eq!(session.view().currency, Some(CurrencyCode::new("USD")));
    }

    #[test]
    fn test_deactivate_discards_late_results() {
        let (mut session, _) = active_with_book(&viewer());
        let v = viewer();
        let n = DirtyFlagNotification::new(CurrencyCode::new("EUR"));
        let ticket = session.on_dirty_flag(&n, &v).unwrap();

        session.deactivate();
        session.deactivate();

        assert!(session.on_offers_loaded(&ticket, Ok(Some(book())), &v).is_none());
        assert!(session.on_dirty_flag(&n, &v).is_none());
        assert_eq!(session.on_tick(&v), TickEffects::default());
        assert!(session.projection().is_empty());
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_volume_inputs_feed_filter_and_take_amount() {
        let v = registered();
        let (mut session, _) = active_with_book(&v);

        session.set_amount_text("2");
        let update = session.set_price_text("100");
        assert_eq!(update.volume.minor_units, 200);
        assert_eq!(session.filter().amount(), Some(dec!(2)));
        assert_eq!(session.filter().price(), Some(dec!(100)));

        // Inputs never narrow the projection
        assert_eq!(session.projection().len(), 3);

        match session.take_offer(&OfferId::new("s1"), &v).unwrap() {
            Resolution::Proceed(take) => assert_eq!(take.requested_amount, dec!(2)),
            other => panic!("unexpected resolution: {other:?}"),
        }
    }

    #[test]
    fn test_take_amount_follows_amount_text() {
        let v = registered();
        let (mut session, _) = active_with_book(&v);
        let requested = |session: &OrderBookSession| match session
            .take_offer(&OfferId::new("s1"), &v)
            .unwrap()
        {
            Resolution::Proceed(take) => take.requested_amount,
            other => panic!("unexpected resolution: {other:?}"),
        };

        session.set_amount_text("0");
        assert_eq!(requested(&session), dec!(0));

        session.set_amount_text("");
        assert_eq!(requested(&session), dec!(1));
    }

    #[test]
    fn test_unregistered_take_redirects_once() {
        let v = viewer();
        let (session, setup) = active_with_book(&v);
        let resolution = session.take_offer(&OfferId::new("s1"), &v).unwrap();
        assert_eq!(resolution, Resolution::Redirect(SetupReason::Unregistered));
        assert_eq!(*setup.redirects.lock().unwrap(), vec![SetupReason::Unregistered]);
    }

    #[test]
    fn test_taking_own_offer_is_an_error() {
        let v = registered();
        let (session, _) = active_with_book(&v);
        assert_eq!(
            session.take_offer(&OfferId::new("mine"), &v).unwrap_err(),
            Error::OwnOffer(OfferId::new("mine"))
        );
    }

    #[test]
    fn test_unregistered_create_redirects_once() {
        let v = viewer();
        let (mut session, setup) = active_with_book(&v);
        let outcome = session.create_offer(&v, &TradingSettings::default());
        assert_eq!(outcome, CreateOfferOutcome::Redirected(SetupReason::Unregistered));
        assert_eq!(setup.redirects.lock().unwrap().len(), 1);
        assert!(!session.view().create_offer_open);
    }

    #[test]
    fn test_incomplete_settings_redirect_distinctly() {
        let v = registered();
        let (mut session, setup) = active_with_book(&v);
        let outcome = session.create_offer(&v, &TradingSettings::default());
        assert_eq!(
            outcome,
            CreateOfferOutcome::Redirected(SetupReason::SettingsIncomplete)
        );
        assert_eq!(
            *setup.redirects.lock().unwrap(),
            vec![SetupReason::SettingsIncomplete]
        );
    }

    #[test]
    fn test_create_offer_open_until_closed() {
        let v = registered();
        let (mut session, _) = active_with_book(&v);
        let mut settings = TradingSettings::default();
        settings.accepted_locales.insert("en".to_string());
        settings.accepted_countries.insert("DE".to_string());
        settings.accepted_arbitrators.insert("arb".to_string());

        assert!(matches!(
            session.create_offer(&v, &settings),
            CreateOfferOutcome::Opened(_)
        ));
        assert_eq!(session.create_offer(&v, &settings), CreateOfferOutcome::AlreadyOpen);

        session.create_offer_closed();
        assert!(matches!(
            session.create_offer(&v, &settings),
            CreateOfferOutcome::Opened(_)
        ));
    }

    #[test]
    fn test_remove_own_offer() {
        let v = viewer();
        let (mut session, _) = active_with_book(&v);
        let id = OfferId::new("mine");

        session.prepare_removal(&id, &v).unwrap();
        session.complete_removal(&id, &v, Ok(())).unwrap();
        assert_eq!(projected_ids(&session), vec!["s1", "s2"]);
    }

    #[test]
    fn test_remove_foreign_offer_rejected() {
        let v = viewer();
        let (mut session, _) = active_with_book(&v);
        let id = OfferId::new("s1");

        assert_eq!(
            session.prepare_removal(&id, &v).unwrap_err(),
            Error::NotOwner { offer_id: id.clone() }
        );
        // Safety net in the store as well
        assert_eq!(
            session.complete_removal(&id, &v, Ok(())).unwrap_err(),
            Error::NotOwner { offer_id: id.clone() }
        );
        assert_eq!(session.projection().len(), 3);
    }

    #[test]
    fn test_network_refusal_keeps_offer() {
        let v = viewer();
        let (mut session, _) = active_with_book(&v);
        let id = OfferId::new("mine");
        let err = NetworkError::Rejected("unknown offer".to_string());

        assert_eq!(
            session.complete_removal(&id, &v, Err(err.clone())).unwrap_err(),
            Error::Network(err)
        );
        assert!(session.projection().get(&id).is_some());
    }

    #[test]
    fn test_live_session_stamps_loads_with_wall_time() {
        let mut session = OrderBookSession::live(
            &MarketConfig::default(),
            Arc::new(RecordingSetup::default()),
        );
        let ticket = session.activate(Direction::Buy, &viewer()).unwrap();

        let before = chrono::Utc::now();
        session.on_offers_loaded(&ticket, Ok(Some(book())), &viewer());
        let after = chrono::Utc::now();

        let stamped = session.store().last_loaded_at().unwrap();
        assert!(before <= stamped && stamped <= after);
    }
}
