//! Common test utilities and fixtures

#![allow(dead_code)]

use inventory_trade::{Advisory, FurniCategory, ItemId, Notifier, StuffData, TradeItem};
use std::sync::{Arc, Mutex};

/// Floor chair, groupable, sprite 18
pub fn chair(id: ItemId) -> TradeItem {
    TradeItem {
        id,
        sprite_id: 18,
        category: FurniCategory::Default,
        is_wall_item: false,
        is_groupable: true,
        stuff_data: StuffData::Empty,
        name: "Chair".to_string(),
        icon_url: None,
    }
}

/// Wall poster; `artwork` decides what it stacks with
pub fn poster(id: ItemId, artwork: &str) -> TradeItem {
    TradeItem {
        id,
        sprite_id: 4001,
        category: FurniCategory::Poster,
        is_wall_item: true,
        is_groupable: true,
        stuff_data: StuffData::Legacy(artwork.to_string()),
        name: format!("Poster {}", artwork),
        icon_url: Some(format!("https://images.example/poster_{}.png", artwork)),
    }
}

/// Collectible that never stacks
pub fn rare(id: ItemId) -> TradeItem {
    TradeItem {
        id,
        sprite_id: 230,
        category: FurniCategory::Default,
        is_wall_item: false,
        is_groupable: false,
        stuff_data: StuffData::Legacy("1".to_string()),
        name: "Throne".to_string(),
        icon_url: None,
    }
}

/// Notifier that keeps every advisory for later inspection
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Advisory>>>,
}

impl RecordingNotifier {
    pub fn advisories(&self) -> Vec<Advisory> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, advisory: Advisory) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(advisory);
        }
    }
}

/// Sample server frames
pub mod frames {
    pub const TRADE_OPENED: &str = r#"{"type": "trade_opened", "other_user_name": "bob"}"#;

    pub const OWN_OFFER: &str = r#"{
        "type": "offer_updated",
        "party": "own",
        "accepted": false,
        "items": [
            {"id": 1, "sprite_id": 18, "category": "default", "is_wall_item": false, "name": "Chair"}
        ]
    }"#;

    pub const INVENTORY: &str = r#"{
        "type": "inventory_list_delivered",
        "items": [
            {"id": 1, "sprite_id": 18, "category": "default", "is_wall_item": false, "name": "Chair"},
            {"id": 2, "sprite_id": 18, "category": "default", "is_wall_item": false, "name": "Chair"}
        ]
    }"#;
}
