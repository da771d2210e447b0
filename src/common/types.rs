//! Unified types shared by the trade core, the desk and the transport

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-assigned identifier of a single inventory item
pub type ItemId = i64;

/// Furniture category as reported by the inventory
///
/// Only `Poster` and `GuildFurni` change how items stack; everything else
/// falls through to the placement-based rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FurniCategory {
    Default,
    WallPaper,
    Floor,
    Landscape,
    PostIt,
    Poster,
    SoundSet,
    TraxSong,
    Present,
    EcotronBox,
    Trophy,
    CreditFurni,
    PetShampoo,
    PetCustomPart,
    PetCustomPartShampoo,
    PetSaddle,
    GuildFurni,
    GameFurni,
    MonsterplantSeed,
    #[serde(other)]
    Unknown,
}

impl FurniCategory {
    /// Map the numeric category code used by the room server
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Default,
            2 => Self::WallPaper,
            3 => Self::Floor,
            4 => Self::Landscape,
            5 => Self::PostIt,
            6 => Self::Poster,
            7 => Self::SoundSet,
            8 => Self::TraxSong,
            9 => Self::Present,
            10 => Self::EcotronBox,
            11 => Self::Trophy,
            12 => Self::CreditFurni,
            13 => Self::PetShampoo,
            14 => Self::PetCustomPart,
            15 => Self::PetCustomPartShampoo,
            16 => Self::PetSaddle,
            17 => Self::GuildFurni,
            18 => Self::GameFurni,
            19 => Self::MonsterplantSeed,
            _ => Self::Unknown,
        }
    }
}

/// Category-specific item attributes carried opaquely by the inventory
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StuffData {
    #[default]
    Empty,
    /// Single string payload (poster variant, state, ...)
    Legacy(String),
    /// Indexed string values (guild furniture: index 1 is the guild id)
    StringArray(Vec<String>),
}

impl StuffData {
    /// The single-string form of the payload
    pub fn legacy_string(&self) -> &str {
        match self {
            StuffData::Empty => "",
            StuffData::Legacy(value) => value,
            StuffData::StringArray(values) => values.first().map(String::as_str).unwrap_or(""),
        }
    }

    /// Value at `index` for array payloads
    pub fn value(&self, index: usize) -> Option<&str> {
        match self {
            StuffData::StringArray(values) => values.get(index).map(String::as_str),
            _ => None,
        }
    }
}

/// One tradeable inventory item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeItem {
    /// Unique item id
    pub id: ItemId,
    /// Furniture sprite/type id
    pub sprite_id: i32,
    pub category: FurniCategory,
    /// Whether the item occupies a wall slot
    #[serde(default)]
    pub is_wall_item: bool,
    /// Whether the item may be stacked with others sharing its key
    #[serde(default = "default_groupable")]
    pub is_groupable: bool,
    #[serde(default)]
    pub stuff_data: StuffData,
    /// Display name resolved by the inventory
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon_url: Option<String>,
}

fn default_groupable() -> bool {
    true
}

/// Side of the negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    Own,
    Other,
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::Own => write!(f, "own"),
            Party::Other => write!(f, "other"),
        }
    }
}

/// Step of the bilateral negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradePhase {
    Ready,
    Running,
    Countdown,
    Confirming,
    Confirmed,
    Closed,
}

impl TradePhase {
    /// Transitions the server is expected to announce from this phase
    pub fn can_transition_to(self, next: TradePhase) -> bool {
        use TradePhase::*;

        matches!(
            (self, next),
            (Ready, Running)
                | (Running, Countdown)
                | (Countdown, Running)
                | (Countdown, Confirming)
                | (Countdown, Confirmed)
                | (Confirming, Running)
                | (Confirming, Confirmed)
        ) || (next == Closed && self != Closed)
    }
}

impl fmt::Display for TradePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TradePhase::Ready => "ready",
            TradePhase::Running => "running",
            TradePhase::Countdown => "countdown",
            TradePhase::Confirming => "confirming",
            TradePhase::Confirmed => "confirmed",
            TradePhase::Closed => "closed",
        };
        write!(f, "{}", name)
    }
}

/// Server-confirmed view of one party's side of the trade
///
/// Replaced wholesale on every `OfferUpdated`; never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OfferSnapshot {
    /// Offered items in server order
    pub items: Vec<TradeItem>,
    pub accepted: bool,
}

impl OfferSnapshot {
    pub fn new(items: Vec<TradeItem>, accepted: bool) -> Self {
        Self { items, accepted }
    }

    /// Whether the item is already part of this offer
    pub fn contains(&self, id: ItemId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Number of offered items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Commands the core hands to the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundCommand {
    RequestInventoryRefresh,
    AddOfferItem { item_id: ItemId },
    /// Always carries more than one id
    AddOfferItems { item_ids: Vec<ItemId> },
    RemoveOfferItem { item_id: ItemId },
    SetAccepted,
    SetUnaccepted,
    ConfirmTrade,
    CloseTrade,
}

/// Events delivered by the transport, processed one at a time in arrival order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// A trade with another user was opened in the room
    TradeOpened { other_user_name: String },
    /// Replaces one party's offer snapshot
    OfferUpdated {
        party: Party,
        items: Vec<TradeItem>,
        accepted: bool,
    },
    /// The server moved the trade to a new phase
    PhaseChanged { phase: TradePhase },
    /// The trade was closed by the other party or by the server
    TradeClosed {
        #[serde(default)]
        reason: Option<String>,
    },
    /// Response to `RequestInventoryRefresh`
    InventoryListDelivered { items: Vec<TradeItem> },
    /// The inventory changed and must be fetched again
    InventoryInvalidated,
}

impl InboundEvent {
    /// Short name for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::TradeOpened { .. } => "trade_opened",
            InboundEvent::OfferUpdated { .. } => "offer_updated",
            InboundEvent::PhaseChanged { .. } => "phase_changed",
            InboundEvent::TradeClosed { .. } => "trade_closed",
            InboundEvent::InventoryListDelivered { .. } => "inventory_list_delivered",
            InboundEvent::InventoryInvalidated => "inventory_invalidated",
        }
    }
}

/// User-visible notice raised by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    /// Accepting while the other party offers nothing
    OtherNotOffering,
    /// Offer would exceed the absolute item limit
    TooManyItems,
    /// Visible slots are full and the item does not extend an offered stack
    OfferSlotsFull,
}

impl Advisory {
    pub fn title_key(&self) -> &'static str {
        match self {
            Advisory::OtherNotOffering => "inventory.trading.warning.other_not_offering.title",
            Advisory::TooManyItems => "trading.items.too_many_items.title",
            Advisory::OfferSlotsFull => "trading.items.slots_full.title",
        }
    }

    pub fn description_key(&self) -> &'static str {
        match self {
            Advisory::OtherNotOffering => "inventory.trading.warning.other_not_offering",
            Advisory::TooManyItems => "trading.items.too_many_items.desc",
            Advisory::OfferSlotsFull => "trading.items.slots_full.desc",
        }
    }
}

/// Key deciding whether two items are fungible for trade-offer purposes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StackingKey(String);

impl StackingKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for StackingKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for StackingKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for StackingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a group in the inventory or in an offer
///
/// Groupable items share a stack; each non-groupable item is a group of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GroupKey {
    Stack(StackingKey),
    Single(ItemId),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Stack(key) => write!(f, "{}", key),
            GroupKey::Single(id) => write!(f, "#{}", id),
        }
    }
}

impl FromStr for GroupKey {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix('#') {
            Some(id) => Ok(GroupKey::Single(id.parse()?)),
            None => Ok(GroupKey::Stack(StackingKey::from(s))),
        }
    }
}

/// Local user actions accepted by the trade desk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// Select an inventory group
    SelectGroup(GroupKey),
    /// Offer up to `count` items from the selected group
    OfferSelected { count: usize },
    /// Retract the most recently offered item of an own-offer group
    RemoveFromOffer(GroupKey),
    /// Context-sensitive accept / unaccept / confirm
    Progress,
    /// Cancel the trade
    Cancel,
}
