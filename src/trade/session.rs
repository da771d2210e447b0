use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::countdown::{Countdown, CountdownStep, CountdownTick, TickScheduler};
use super::group_item::GroupItem;
use super::offer_policy::{OfferOutcome, TradeOfferPolicy};
use crate::common::types::{
    Advisory, GroupKey, OfferSnapshot, OutboundCommand, Party, TradeItem, TradePhase,
};
use crate::config::types::TradeSettings;

/// Countdown generations are unique for the whole process, so a tick can
/// never be mistaken for one belonging to a later countdown or session.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Side effect requested by the session, carried out by the desk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Send(OutboundCommand),
    Notify(Advisory),
}

/// Label of the accept control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlLabel {
    Accept,
    Modify,
    Countdown(i32),
    Restore,
    Waiting,
}

impl ControlLabel {
    pub fn localization_key(&self) -> &'static str {
        match self {
            ControlLabel::Accept => "inventory.trading.accept",
            ControlLabel::Modify => "inventory.trading.modify",
            ControlLabel::Countdown(_) => "inventory.trading.countdown",
            ControlLabel::Restore => "inventory.trading.button.restore",
            ControlLabel::Waiting => "inventory.trading.info.waiting",
        }
    }
}

/// State of the accept control for the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeControl {
    pub label: ControlLabel,
    pub enabled: bool,
}

/// One active trade negotiation
///
/// Phases advance from server events, except CONFIRMING -> CONFIRMED which
/// the local confirm action applies immediately, and COUNTDOWN -> CONFIRMING
/// which the owned countdown applies when it runs out. The countdown exists
/// only while the phase is COUNTDOWN.
pub struct TradeSession {
    phase: TradePhase,
    other_user_name: String,
    own: Option<OfferSnapshot>,
    other: Option<OfferSnapshot>,
    countdown: Option<Countdown>,
    countdown_start: i32,
    scheduler: Arc<dyn TickScheduler>,
    opened_at: DateTime<Utc>,
}

impl TradeSession {
    pub fn new(
        other_user_name: impl Into<String>,
        settings: &TradeSettings,
        scheduler: Arc<dyn TickScheduler>,
    ) -> Self {
        let other_user_name = other_user_name.into();
        info!(other = %other_user_name, "Trade opened");

        Self {
            phase: TradePhase::Ready,
            other_user_name,
            own: None,
            other: None,
            countdown: None,
            countdown_start: settings.countdown_start,
            scheduler,
            opened_at: Utc::now(),
        }
    }

    pub fn phase(&self) -> TradePhase {
        self.phase
    }

    pub fn is_closed(&self) -> bool {
        self.phase == TradePhase::Closed
    }

    pub fn other_user_name(&self) -> &str {
        &self.other_user_name
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn offer(&self, party: Party) -> Option<&OfferSnapshot> {
        match party {
            Party::Own => self.own.as_ref(),
            Party::Other => self.other.as_ref(),
        }
    }

    pub fn own_offer(&self) -> Option<&OfferSnapshot> {
        self.own.as_ref()
    }

    pub fn other_offer(&self) -> Option<&OfferSnapshot> {
        self.other.as_ref()
    }

    /// Value shown on the control while counting down
    pub fn countdown_remaining(&self) -> Option<i32> {
        self.countdown.as_ref().map(Countdown::remaining)
    }

    /// Generation of the running countdown, if any
    pub fn countdown_generation(&self) -> Option<u64> {
        self.countdown.as_ref().map(Countdown::generation)
    }

    fn item_count(&self, party: Party) -> usize {
        self.offer(party).map(OfferSnapshot::len).unwrap_or(0)
    }

    fn own_accepted(&self) -> bool {
        self.own.as_ref().map(|o| o.accepted).unwrap_or(false)
    }

    pub fn control(&self) -> TradeControl {
        let has_items = self.item_count(Party::Own) > 0 || self.item_count(Party::Other) > 0;

        match self.phase {
            TradePhase::Ready => TradeControl {
                label: ControlLabel::Accept,
                enabled: has_items,
            },
            TradePhase::Running => TradeControl {
                label: if self.own_accepted() {
                    ControlLabel::Modify
                } else {
                    ControlLabel::Accept
                },
                enabled: has_items,
            },
            TradePhase::Countdown => TradeControl {
                label: ControlLabel::Countdown(
                    self.countdown_remaining().unwrap_or(self.countdown_start),
                ),
                enabled: false,
            },
            TradePhase::Confirming => TradeControl {
                label: ControlLabel::Restore,
                enabled: true,
            },
            TradePhase::Confirmed | TradePhase::Closed => TradeControl {
                label: ControlLabel::Waiting,
                enabled: false,
            },
        }
    }

    fn enter(&mut self, next: TradePhase) {
        let previous = self.phase;

        // Leaving COUNTDOWN by any path stops its ticker.
        self.countdown = None;
        self.phase = next;

        if next == TradePhase::Countdown {
            let generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
            self.countdown = Some(Countdown::start(
                self.countdown_start,
                generation,
                self.scheduler.as_ref(),
            ));
        }

        info!(from = %previous, to = %next, "Trade phase changed");
    }

    /// Replace one party's snapshot with the server's view
    pub fn apply_offer_update(&mut self, party: Party, items: Vec<TradeItem>, accepted: bool) {
        if self.is_closed() {
            debug!(%party, "Offer update after close ignored");
            return;
        }

        let snapshot = OfferSnapshot::new(items, accepted);
        debug!(%party, items = snapshot.len(), accepted, "Offer updated");
        let active = !snapshot.is_empty() || snapshot.accepted;

        match party {
            Party::Own => self.own = Some(snapshot),
            Party::Other => self.other = Some(snapshot),
        }

        if self.phase == TradePhase::Ready && active {
            self.enter(TradePhase::Running);
        }
    }

    /// Follow a phase announced by the server
    ///
    /// The server is authoritative: an unexpected transition is logged and
    /// applied anyway.
    pub fn apply_phase(&mut self, next: TradePhase) {
        if self.phase == next {
            debug!(phase = %next, "Phase already current");
            return;
        }
        if self.is_closed() {
            debug!(phase = %next, "Phase change after close ignored");
            return;
        }
        if !self.phase.can_transition_to(next) {
            warn!(
                from = %self.phase,
                to = %next,
                "Protocol desync, reconciling to server phase"
            );
        }
        self.enter(next);
    }

    /// Apply a countdown tick; returns true when it moved the phase on
    pub fn on_tick(&mut self, tick: CountdownTick) -> bool {
        let countdown = match self.countdown.as_mut() {
            Some(countdown)
                if countdown.generation() == tick.generation
                    && self.phase == TradePhase::Countdown =>
            {
                countdown
            }
            _ => {
                debug!(generation = tick.generation, "Discarding orphan countdown tick");
                return false;
            }
        };

        match countdown.tick() {
            CountdownStep::Remaining(remaining) => {
                debug!(remaining, "Countdown tick");
                false
            }
            CountdownStep::Elapsed => {
                self.enter(TradePhase::Confirming);
                true
            }
        }
    }

    /// Context-sensitive accept / unaccept / confirm
    pub fn progress(&mut self) -> Vec<Effect> {
        match self.phase {
            TradePhase::Running => {
                if !self.control().enabled {
                    debug!("Nothing offered on either side, accept is disabled");
                    return Vec::new();
                }

                let own_accepted = self.own_accepted();
                let mut effects = Vec::new();

                if self.item_count(Party::Other) == 0 && !own_accepted {
                    effects.push(Effect::Notify(Advisory::OtherNotOffering));
                }
                effects.push(Effect::Send(if own_accepted {
                    OutboundCommand::SetUnaccepted
                } else {
                    OutboundCommand::SetAccepted
                }));
                effects
            }
            TradePhase::Confirming => {
                self.enter(TradePhase::Confirmed);
                vec![Effect::Send(OutboundCommand::ConfirmTrade)]
            }
            phase => {
                debug!(%phase, "Progress has no effect in this phase");
                Vec::new()
            }
        }
    }

    /// Offer up to `count` items from an inventory group
    pub fn offer_from(
        &self,
        group: &GroupItem,
        count: usize,
        policy: &TradeOfferPolicy,
    ) -> Vec<Effect> {
        if self.is_closed() {
            return Vec::new();
        }

        let outcome = policy.attempt_offer(group, count, self.own.as_ref());
        if let OfferOutcome::Rejected(rejection) = &outcome {
            info!(group = %group.key(), ?rejection, "Offer rejected by trade policy");
        }

        outcome
            .command()
            .map(Effect::Send)
            .into_iter()
            .chain(outcome.advisory().map(Effect::Notify))
            .collect()
    }

    /// Retract the most recently offered item of an own-offer group
    pub fn remove_from_offer(&self, key: &GroupKey) -> Vec<Effect> {
        if self.is_closed() {
            return Vec::new();
        }

        let own = match self.own.as_ref() {
            Some(own) => own,
            None => return Vec::new(),
        };

        let groups = own.groups();
        let item = groups
            .iter()
            .find(|group| group.key() == key)
            .and_then(|group| group.last_offered(own));

        match item {
            Some(item) => vec![Effect::Send(OutboundCommand::RemoveOfferItem { item_id: item.id })],
            None => {
                debug!(group = %key, "Group not in own offer, nothing to remove");
                Vec::new()
            }
        }
    }

    /// Local cancellation
    pub fn cancel(&mut self) -> Vec<Effect> {
        if self.is_closed() {
            return Vec::new();
        }
        self.enter(TradePhase::Closed);
        vec![Effect::Send(OutboundCommand::CloseTrade)]
    }

    /// Forced close by the other party or the server
    pub fn close(&mut self, reason: Option<&str>) {
        if self.is_closed() {
            return;
        }
        info!(reason = reason.unwrap_or("none"), "Trade closed remotely");
        self.enter(TradePhase::Closed);
    }
}

impl std::fmt::Debug for TradeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradeSession")
            .field("phase", &self.phase)
            .field("other_user_name", &self.other_user_name)
            .field("own", &self.own)
            .field("other", &self.other)
            .field("countdown", &self.countdown)
            .field("opened_at", &self.opened_at)
            .finish()
    }
}
