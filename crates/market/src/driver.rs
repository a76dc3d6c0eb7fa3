//! Session driver
//!
//! Runs an [`OrderBookSession`] on one tokio task. Every input (poll
//! ticks, dirty-flag notifications, the reload in flight, viewer identity
//! changes and UI commands) is multiplexed with a biased `select!`, so the
//! session itself never needs a lock. After each event the current
//! [`OrderBookView`] is published on a watch channel.

use log::{debug, info, warn};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tradebook_clock::IntervalTicker;
use tradebook_core::{Direction, Offer, OfferId, TradingSettings, ViewerIdentity};
use tradebook_ports::{DirtyFlagNotification, NetworkResult, OfferNetwork, Ticker};

use crate::config::MarketConfig;
use crate::error::{Error, Result};
use crate::resolver::{Resolution, TakeRequest};
use crate::session::{CreateOfferOutcome, OrderBookSession, OrderBookView};
use crate::store::LoadTicket;
use crate::volume::VolumeUpdate;

type ReloadFuture =
    Pin<Box<dyn Future<Output = (LoadTicket, NetworkResult<Option<Vec<Offer>>>)> + Send>>;

/// A withdrawal the network has answered, with the caller still waiting
type Removal = (OfferId, NetworkResult<()>, oneshot::Sender<Result<()>>);

/// Requests from the presentation layer
#[derive(Debug)]
pub enum SessionCommand {
    SetDirection {
        direction: Direction,
        reply: oneshot::Sender<()>,
    },
    SetAmountText {
        text: String,
        reply: oneshot::Sender<VolumeUpdate>,
    },
    SetPriceText {
        text: String,
        reply: oneshot::Sender<VolumeUpdate>,
    },
    TakeOffer {
        offer_id: OfferId,
        reply: oneshot::Sender<Result<Resolution<TakeRequest>>>,
    },
    RemoveOffer {
        offer_id: OfferId,
        reply: oneshot::Sender<Result<()>>,
    },
    CreateOffer {
        reply: oneshot::Sender<CreateOfferOutcome>,
    },
    CreateOfferClosed {
        reply: oneshot::Sender<()>,
    },
    /// Current view, answered once all queued events are handled
    Snapshot {
        reply: oneshot::Sender<OrderBookView>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// External collaborators a driver is wired to
pub struct SessionWiring {
    pub network: Arc<dyn OfferNetwork>,
    pub ticker: Box<dyn Ticker>,
    /// Receiving end of the channel the network answers dirty flags on
    pub notifications: mpsc::UnboundedReceiver<DirtyFlagNotification>,
    pub identity: watch::Receiver<ViewerIdentity>,
    pub settings: watch::Receiver<TradingSettings>,
}

impl SessionWiring {
    /// Wiring that polls on a tokio interval at the configured period
    pub fn with_interval(
        config: &MarketConfig,
        network: Arc<dyn OfferNetwork>,
        notifications: mpsc::UnboundedReceiver<DirtyFlagNotification>,
        identity: watch::Receiver<ViewerIdentity>,
        settings: watch::Receiver<TradingSettings>,
    ) -> Self {
        Self {
            network,
            ticker: Box::new(IntervalTicker::new(config.poll_interval())),
            notifications,
            identity,
            settings,
        }
    }
}

enum Event {
    Tick,
    Dirty(DirtyFlagNotification),
    Loaded(LoadTicket, NetworkResult<Option<Vec<Offer>>>),
    Removed(std::result::Result<Removal, JoinError>),
    IdentityChanged,
    Command(Option<SessionCommand>),
}

pub struct SessionDriver {
    session: OrderBookSession,
    network: Arc<dyn OfferNetwork>,
    ticker: Box<dyn Ticker>,
    notifications: mpsc::UnboundedReceiver<DirtyFlagNotification>,
    identity: watch::Receiver<ViewerIdentity>,
    settings: watch::Receiver<TradingSettings>,
    commands: mpsc::Receiver<SessionCommand>,
    view_tx: watch::Sender<OrderBookView>,
    reload: Option<ReloadFuture>,
    removals: JoinSet<Removal>,
}

impl SessionDriver {
    /// Activate `session` for `direction` and run it on a new task
    pub fn spawn(
        session: OrderBookSession,
        direction: Direction,
        wiring: SessionWiring,
        command_capacity: usize,
    ) -> (SessionHandle, JoinHandle<()>) {
        let (command_tx, commands) = mpsc::channel(command_capacity.max(1));
        let (view_tx, view_rx) = watch::channel(session.view());

        let driver = Self {
            session,
            network: wiring.network,
            ticker: wiring.ticker,
            notifications: wiring.notifications,
            identity: wiring.identity,
            settings: wiring.settings,
            commands,
            view_tx,
            reload: None,
            removals: JoinSet::new(),
        };

        let task = tokio::spawn(driver.run(direction));
        let handle = SessionHandle {
            commands: command_tx,
            view: view_rx,
        };
        (handle, task)
    }

    async fn run(mut self, direction: Direction) {
        let viewer = self.viewer();
        let initial = self.session.activate(direction, &viewer);
        self.start_reload(initial);
        self.publish();
        info!("Session driver started");

        loop {
            let event = tokio::select! {
                biased;

                _ = self.ticker.tick() => Event::Tick,

                Some(notification) = self.notifications.recv() => Event::Dirty(notification),

                (ticket, result) = Self::reload_done(&mut self.reload) => Event::Loaded(ticket, result),

                Some(joined) = self.removals.join_next() => Event::Removed(joined),

                Ok(()) = self.identity.changed() => Event::IdentityChanged,

                command = self.commands.recv() => Event::Command(command),
            };

            match event {
                Event::Tick => self.handle_tick(),
                Event::Dirty(notification) => {
                    let viewer = self.viewer();
                    let next = self.session.on_dirty_flag(&notification, &viewer);
                    self.start_reload(next);
                }
                Event::Loaded(ticket, result) => {
                    self.reload = None;
                    let viewer = self.viewer();
                    let next = self.session.on_offers_loaded(&ticket, result, &viewer);
                    self.start_reload(next);
                }
                Event::Removed(Ok((offer_id, result, reply))) => {
                    let _ = reply.send(self.finish_removal(&offer_id, result));
                }
                Event::Removed(Err(e)) => warn!("Offer removal task failed: {}", e),
                Event::IdentityChanged => {
                    let viewer = self.identity.borrow_and_update().clone();
                    let next = self.session.on_account_changed(&viewer);
                    self.start_reload(next);
                }
                Event::Command(Some(SessionCommand::Shutdown { reply })) => {
                    self.stop();
                    let _ = reply.send(());
                    return;
                }
                Event::Command(Some(command)) => self.handle_command(command),
                Event::Command(None) => {
                    debug!("All session handles dropped");
                    break;
                }
            }

            self.publish();
        }

        self.stop();
    }

    async fn reload_done(
        reload: &mut Option<ReloadFuture>,
    ) -> (LoadTicket, NetworkResult<Option<Vec<Offer>>>) {
        match reload {
            Some(future) => future.await,
            None => std::future::pending().await,
        }
    }

    fn handle_tick(&mut self) {
        let viewer = self.viewer();
        let effects = self.session.on_tick(&viewer);
        if let Some(currency) = effects.dirty_query {
            self.network.request_dirty_flag(&currency);
        }
        self.start_reload(effects.reload);
    }

    fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::SetDirection { direction, reply } => {
                let viewer = self.viewer();
                let next = self.session.set_direction(direction, &viewer);
                self.start_reload(next);
                let _ = reply.send(());
            }
            SessionCommand::SetAmountText { text, reply } => {
                let _ = reply.send(self.session.set_amount_text(&text));
            }
            SessionCommand::SetPriceText { text, reply } => {
                let _ = reply.send(self.session.set_price_text(&text));
            }
            SessionCommand::TakeOffer { offer_id, reply } => {
                let viewer = self.viewer();
                let _ = reply.send(self.session.take_offer(&offer_id, &viewer));
            }
            SessionCommand::RemoveOffer { offer_id, reply } => {
                self.start_removal(offer_id, reply);
            }
            SessionCommand::CreateOffer { reply } => {
                let viewer = self.viewer();
                let settings = self.settings.borrow().clone();
                let _ = reply.send(self.session.create_offer(&viewer, &settings));
            }
            SessionCommand::CreateOfferClosed { reply } => {
                self.session.create_offer_closed();
                let _ = reply.send(());
            }
            SessionCommand::Snapshot { reply } => {
                let _ = reply.send(self.session.view());
            }
            SessionCommand::Shutdown { reply } => {
                // Handled by the run loop
                let _ = reply.send(());
            }
        }
    }

    /// Ask the network to withdraw an own offer without holding up the loop
    fn start_removal(&mut self, offer_id: OfferId, reply: oneshot::Sender<Result<()>>) {
        let viewer = self.viewer();
        if let Err(e) = self.session.prepare_removal(&offer_id, &viewer) {
            let _ = reply.send(Err(e));
            return;
        }
        debug!("Withdrawing offer {}", offer_id);
        let network = self.network.clone();
        self.removals.spawn(async move {
            let result = network.remove_offer(&offer_id).await;
            (offer_id, result, reply)
        });
    }

    fn finish_removal(&mut self, offer_id: &OfferId, result: NetworkResult<()>) -> Result<()> {
        let viewer = self.viewer();
        match self.session.complete_removal(offer_id, &viewer, result) {
            Ok(_) => Ok(()),
            // A reload already dropped the withdrawn offer
            Err(Error::OfferNotFound(_)) => {
                debug!("Offer {} already gone from the snapshot", offer_id);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn start_reload(&mut self, ticket: Option<LoadTicket>) {
        let Some(ticket) = ticket else {
            return;
        };
        debug!("Reloading offers for {}", ticket.currency());
        let network = self.network.clone();
        self.reload = Some(Box::pin(async move {
            let result = network.fetch_offers(ticket.currency()).await;
            (ticket, result)
        }));
    }

    fn viewer(&self) -> ViewerIdentity {
        self.identity.borrow().clone()
    }

    fn publish(&self) {
        self.view_tx.send_replace(self.session.view());
    }

    fn stop(&mut self) {
        self.reload = None;
        self.removals.abort_all();
        self.session.deactivate();
        self.publish();
        info!("Session driver stopped");
    }
}

/// Cloneable front end of a running session
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    view: watch::Receiver<OrderBookView>,
}

impl SessionHandle {
    /// Receiver that always holds the latest published view
    pub fn view(&self) -> watch::Receiver<OrderBookView> {
        self.view.clone()
    }

    pub async fn set_direction(&self, direction: Direction) -> Result<()> {
        self.request(|reply| SessionCommand::SetDirection { direction, reply })
            .await
    }

    pub async fn set_amount_text(&self, text: impl Into<String>) -> Result<VolumeUpdate> {
        let text = text.into();
        self.request(|reply| SessionCommand::SetAmountText { text, reply })
            .await
    }

    pub async fn set_price_text(&self, text: impl Into<String>) -> Result<VolumeUpdate> {
        let text = text.into();
        self.request(|reply| SessionCommand::SetPriceText { text, reply })
            .await
    }

    pub async fn take_offer(&self, offer_id: OfferId) -> Result<Resolution<TakeRequest>> {
        self.request(|reply| SessionCommand::TakeOffer { offer_id, reply })
            .await?
    }

    pub async fn remove_offer(&self, offer_id: OfferId) -> Result<()> {
        self.request(|reply| SessionCommand::RemoveOffer { offer_id, reply })
            .await?
    }

    pub async fn create_offer(&self) -> Result<CreateOfferOutcome> {
        self.request(|reply| SessionCommand::CreateOffer { reply })
            .await
    }

    pub async fn create_offer_closed(&self) -> Result<()> {
        self.request(|reply| SessionCommand::CreateOfferClosed { reply })
            .await
    }

    /// View after every event queued so far has been handled
    pub async fn snapshot(&self) -> Result<OrderBookView> {
        self.request(|reply| SessionCommand::Snapshot { reply })
            .await
    }

    /// Stop polling, discard anything in flight and end the task
    pub async fn shutdown(&self) -> Result<()> {
        self.request(|reply| SessionCommand::Shutdown { reply })
            .await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| Error::SessionClosed)?;
        response.await.map_err(|_| Error::SessionClosed)
    }
}
