//! Configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Room server transport configuration
    #[serde(default)]
    pub transport: TransportConfig,
    /// Negotiation limits and timers
    #[serde(default)]
    pub trade: TradeSettings,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// Room server transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// WebSocket URL of the room server
    #[serde(default = "default_websocket_url")]
    pub websocket_url: String,
    /// Buffer size of the command and event channels
    #[serde(default = "default_channel_size")]
    pub channel_size: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            websocket_url: default_websocket_url(),
            channel_size: default_channel_size(),
        }
    }
}

fn default_websocket_url() -> String {
    "ws://127.0.0.1:2096".to_string()
}

fn default_channel_size() -> usize {
    1000
}

/// Negotiation limits and timers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSettings {
    /// Offered items below which any item may be added freely
    #[serde(default = "default_visible_slot_cap")]
    pub visible_slot_cap: usize,
    /// Hard upper bound on own offered items
    #[serde(default = "default_max_offer_items")]
    pub max_offer_items: usize,
    /// First value shown when the countdown starts
    #[serde(default = "default_countdown_start")]
    pub countdown_start: i32,
    /// Countdown tick period in milliseconds
    #[serde(default = "default_countdown_tick_ms")]
    pub countdown_tick_ms: u64,
}

impl TradeSettings {
    pub fn countdown_period(&self) -> Duration {
        Duration::from_millis(self.countdown_tick_ms)
    }
}

impl Default for TradeSettings {
    fn default() -> Self {
        Self {
            visible_slot_cap: default_visible_slot_cap(),
            max_offer_items: default_max_offer_items(),
            countdown_start: default_countdown_start(),
            countdown_tick_ms: default_countdown_tick_ms(),
        }
    }
}

fn default_visible_slot_cap() -> usize {
    9
}

fn default_max_offer_items() -> usize {
    1500
}

fn default_countdown_start() -> i32 {
    3
}

fn default_countdown_tick_ms() -> u64 {
    1000
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Heartbeat/ping interval in seconds
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_seconds: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            heartbeat_interval_seconds: default_heartbeat_interval(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_heartbeat_interval() -> u64 {
    10
}
