//! Trade module for peer-to-peer inventory negotiation
//!
//! This module holds the negotiation core: how inventory items stack, which
//! items may be offered, and the session state machine that follows the
//! room server.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    LOCAL (user actions)                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  UserAction                                                 │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  TradeOfferPolicy (GroupItem + StackingKeyResolver)         │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  OutboundCommand ──► transport (fire-and-forget)            │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    REMOTE (server authority)                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  InboundEvent                                               │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  TradeSession                                               │
//! │    - replaces OfferSnapshots wholesale                      │
//! │    - follows phases, reconciles desyncs                     │
//! │    - owns the COUNTDOWN timer                               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`StackingKeyResolver`]: category-aware key deciding what stacks
//! - [`GroupItem`]: inventory items aggregated by key
//! - [`Inventory`]: latest delivered list plus the refresh flag
//! - [`TradeOfferPolicy`]: which ids an offer action may send
//! - [`TradeSession`]: phases, snapshots and the countdown
//! - [`TradeDesk`]: single actor tying the above to the channels
//!
//! # Phases
//!
//! ```text
//! READY ──► RUNNING ──► COUNTDOWN ──► CONFIRMING ──► CONFIRMED
//!   │          │  ▲         │  (3,2,1,0)   │
//!   │          │  └─────────┘              │
//!   └──────────┴───────── any ──► CLOSED ◄─┘
//! ```

pub mod countdown;
pub mod desk;
pub mod group_item;
pub mod inventory;
pub mod offer_policy;
pub mod session;
pub mod stacking;

pub use countdown::{
    Countdown, CountdownStep, CountdownTick, IntervalScheduler, ManualScheduler, TickScheduler,
    TimerHandle,
};
pub use desk::TradeDesk;
pub use group_item::{group_items, GroupItem};
pub use inventory::Inventory;
pub use offer_policy::{OfferOutcome, PolicyRejection, TradeOfferPolicy};
pub use session::{ControlLabel, Effect, TradeControl, TradeSession};
pub use stacking::{StackingKeyResolver, StackingRule};
