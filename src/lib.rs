//! InventoryTrade Library
//!
//! Client-side engine for peer-to-peer inventory trades negotiated
//! against a room server that owns the authoritative trade state.

pub mod common;
pub mod config;
pub mod trade;
pub mod transport;

// Re-export commonly used types
pub use common::errors::{Result, TradeError};
pub use common::traits::{LogNotifier, Notifier, TradeTransport};
pub use common::types::{
    Advisory, FurniCategory, GroupKey, InboundEvent, ItemId, OfferSnapshot, OutboundCommand,
    Party, StackingKey, StuffData, TradeItem, TradePhase, UserAction,
};
pub use config::types::{AppConfig, TradeSettings};
pub use transport::WebSocketTransport;

// Trade core
pub use trade::{
    ControlLabel, CountdownTick, Effect, GroupItem, Inventory, OfferOutcome, PolicyRejection,
    StackingKeyResolver, TradeControl, TradeDesk, TradeOfferPolicy, TradeSession,
};
