use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::countdown::{CountdownTick, IntervalScheduler, TickScheduler};
use super::inventory::Inventory;
use super::offer_policy::TradeOfferPolicy;
use super::session::{Effect, TradeSession};
use crate::common::channels::create_tick_channel;
use crate::common::errors::Result;
use crate::common::traits::Notifier;
use crate::common::types::{GroupKey, InboundEvent, OutboundCommand, UserAction};
use crate::config::types::TradeSettings;

/// Single-actor owner of the inventory view and the active trade
///
/// Every inbound event, user action and countdown tick runs to completion
/// before the next one is looked at. When several are ready at once,
/// inbound events go first and countdown ticks last.
pub struct TradeDesk<N: Notifier> {
    settings: TradeSettings,
    policy: TradeOfferPolicy,
    inventory: Inventory,
    session: Option<TradeSession>,
    selected: Option<GroupKey>,
    commands: mpsc::Sender<OutboundCommand>,
    notifier: N,
    scheduler: Arc<dyn TickScheduler>,
}

impl<N: Notifier> TradeDesk<N> {
    pub fn new(
        settings: TradeSettings,
        commands: mpsc::Sender<OutboundCommand>,
        notifier: N,
        scheduler: Arc<dyn TickScheduler>,
    ) -> Self {
        Self {
            policy: TradeOfferPolicy::from_settings(&settings),
            settings,
            inventory: Inventory::new(),
            session: None,
            selected: None,
            commands,
            notifier,
            scheduler,
        }
    }

    /// Desk whose countdowns tick on a tokio interval
    ///
    /// Returns the receiver to hand to [`TradeDesk::run`].
    pub fn with_interval_ticks(
        settings: TradeSettings,
        commands: mpsc::Sender<OutboundCommand>,
        notifier: N,
    ) -> (Self, mpsc::Receiver<CountdownTick>) {
        let (tick_tx, tick_rx) = create_tick_channel();
        let scheduler = Arc::new(IntervalScheduler::new(settings.countdown_period(), tick_tx));
        (Self::new(settings, commands, notifier, scheduler), tick_rx)
    }

    pub fn session(&self) -> Option<&TradeSession> {
        self.session.as_ref()
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn selected(&self) -> Option<&GroupKey> {
        self.selected.as_ref()
    }

    /// Ask for a fresh inventory list if the current one is stale
    ///
    /// The flag stays raised while the command queue is full.
    pub fn sync_inventory(&mut self) {
        if !self.inventory.needs_refresh() {
            return;
        }

        match self.commands.try_reserve() {
            Ok(permit) => {
                if let Some(command) = self.inventory.take_refresh_request() {
                    debug!(?command, "Queueing outbound command");
                    permit.send(command);
                }
            }
            Err(e) => warn!("Inventory refresh deferred: {}", e),
        }
    }

    pub fn handle_event(&mut self, event: InboundEvent) {
        debug!(kind = event.kind(), "Inbound event");

        match event {
            InboundEvent::TradeOpened { other_user_name } => {
                if let Some(previous) = self.session.as_ref() {
                    warn!(
                        previous = previous.other_user_name(),
                        "Trade opened while another was active, replacing it"
                    );
                }
                self.selected = None;
                self.session = Some(TradeSession::new(
                    other_user_name,
                    &self.settings,
                    self.scheduler.clone(),
                ));
            }
            InboundEvent::OfferUpdated {
                party,
                items,
                accepted,
            } => match self.session.as_mut() {
                Some(session) => session.apply_offer_update(party, items, accepted),
                None => debug!(%party, "Offer update without an active trade"),
            },
            InboundEvent::PhaseChanged { phase } => match self.session.as_mut() {
                Some(session) => session.apply_phase(phase),
                None => debug!(%phase, "Phase change without an active trade"),
            },
            InboundEvent::TradeClosed { reason } => {
                if let Some(session) = self.session.as_mut() {
                    session.close(reason.as_deref());
                }
            }
            InboundEvent::InventoryListDelivered { items } => {
                self.inventory.replace(items);
            }
            InboundEvent::InventoryInvalidated => {
                self.inventory.invalidate();
            }
        }

        self.discard_closed_session();
        self.sync_inventory();
    }

    /// Apply a local action
    ///
    /// A queue slot is reserved before the session is touched, so an action
    /// that cannot send its command is dropped without changing any state.
    pub fn handle_action(&mut self, action: UserAction) {
        debug!(?action, "User action");

        let action = match action {
            UserAction::SelectGroup(key) => {
                self.select_group(key);
                return;
            }
            action => action,
        };

        let permit = match self.commands.try_reserve() {
            Ok(permit) => permit,
            Err(e) => {
                warn!(?action, "Action dropped, command queue unavailable: {}", e);
                return;
            }
        };

        let effects = match action {
            UserAction::SelectGroup(_) => Vec::new(),
            UserAction::OfferSelected { count } => self.offer_selected(count),
            UserAction::RemoveFromOffer(key) => match self.session.as_ref() {
                Some(session) => session.remove_from_offer(&key),
                None => Vec::new(),
            },
            UserAction::Progress => match self.session.as_mut() {
                Some(session) => session.progress(),
                None => Vec::new(),
            },
            UserAction::Cancel => match self.session.as_mut() {
                Some(session) => session.cancel(),
                None => Vec::new(),
            },
        };

        let mut permit = Some(permit);
        for effect in effects {
            match effect {
                Effect::Send(command) => match permit.take() {
                    Some(permit) => {
                        debug!(?command, "Queueing outbound command");
                        permit.send(command);
                    }
                    None => self.send(command),
                },
                Effect::Notify(advisory) => self.notifier.notify(advisory),
            }
        }
        drop(permit);

        self.discard_closed_session();
    }

    pub fn handle_tick(&mut self, tick: CountdownTick) {
        match self.session.as_mut() {
            Some(session) => {
                session.on_tick(tick);
            }
            None => debug!(generation = tick.generation, "Tick without an active trade"),
        }
    }

    fn select_group(&mut self, key: GroupKey) {
        let own = self.session.as_ref().and_then(|s| s.own_offer());
        let available = self
            .inventory
            .group(&key)
            .map(|group| own.map(|o| group.unlocked_count(o)).unwrap_or(group.total_count()))
            .unwrap_or(0);

        if available == 0 {
            debug!(group = %key, "Group missing or fully offered, selection ignored");
            return;
        }
        self.selected = Some(key);
    }

    fn offer_selected(&self, count: usize) -> Vec<Effect> {
        let (session, key) = match (self.session.as_ref(), self.selected.as_ref()) {
            (Some(session), Some(key)) => (session, key),
            _ => {
                debug!("No active trade or no selected group");
                return Vec::new();
            }
        };

        match self.inventory.group(key) {
            Some(group) => session.offer_from(group, count, &self.policy),
            None => {
                debug!(group = %key, "Selected group no longer in inventory");
                Vec::new()
            }
        }
    }

    fn send(&self, command: OutboundCommand) {
        debug!(?command, "Queueing outbound command");
        if let Err(e) = self.commands.try_send(command) {
            error!("Failed to queue outbound command: {}", e);
        }
    }

    fn discard_closed_session(&mut self) {
        if self.session.as_ref().map(TradeSession::is_closed).unwrap_or(false) {
            self.session = None;
            self.selected = None;
            info!("Trade session discarded");
        }
    }

    /// Process events, actions and ticks until the event stream ends
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<InboundEvent>,
        mut actions: mpsc::Receiver<UserAction>,
        mut ticks: mpsc::Receiver<CountdownTick>,
    ) -> Result<()> {
        info!("Trade desk started");
        self.sync_inventory();

        let mut actions_open = true;
        let mut ticks_open = true;

        loop {
            tokio::select! {
                biased;

                event = events.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => {
                        info!("Event stream ended, stopping trade desk");
                        break;
                    }
                },
                action = actions.recv(), if actions_open => match action {
                    Some(action) => self.handle_action(action),
                    None => actions_open = false,
                },
                tick = ticks.recv(), if ticks_open => match tick {
                    Some(tick) => self.handle_tick(tick),
                    None => ticks_open = false,
                },
            }
        }

        Ok(())
    }
}
