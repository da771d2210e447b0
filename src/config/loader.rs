//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::{AppConfig, AppSettings, TradeSettings, TransportConfig};
use crate::common::errors::{Result, TradeError};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with APP_, `__` between sections)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| TradeError::Configuration(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| TradeError::Configuration(e.to_string()))?;

    validate(&app_config)?;
    Ok(app_config)
}

/// Load configuration from `TRADE_*` environment variables only
pub fn load_from_env() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let defaults = TradeSettings::default();
    let trade = TradeSettings {
        visible_slot_cap: env_parse("TRADE_VISIBLE_SLOT_CAP")?.unwrap_or(defaults.visible_slot_cap),
        max_offer_items: env_parse("TRADE_MAX_OFFER_ITEMS")?.unwrap_or(defaults.max_offer_items),
        countdown_start: env_parse("TRADE_COUNTDOWN_START")?.unwrap_or(defaults.countdown_start),
        countdown_tick_ms: env_parse("TRADE_COUNTDOWN_TICK_MS")?
            .unwrap_or(defaults.countdown_tick_ms),
    };

    let transport_defaults = TransportConfig::default();
    let transport = TransportConfig {
        websocket_url: std::env::var("TRADE_WS_URL").unwrap_or(transport_defaults.websocket_url),
        channel_size: env_parse("TRADE_CHANNEL_SIZE")?.unwrap_or(transport_defaults.channel_size),
    };

    let app_config = AppConfig {
        transport,
        trade,
        settings: AppSettings::default(),
    };

    validate(&app_config)?;
    Ok(app_config)
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| TradeError::Configuration(format!("{} has an invalid value: {}", name, raw))),
        Err(_) => Ok(None),
    }
}

fn validate(config: &AppConfig) -> Result<()> {
    url::Url::parse(&config.transport.websocket_url)?;

    if config.transport.channel_size == 0 {
        return Err(TradeError::Configuration(
            "transport.channel_size must be positive".to_string(),
        ));
    }
    if config.trade.visible_slot_cap > config.trade.max_offer_items {
        return Err(TradeError::Configuration(format!(
            "trade.visible_slot_cap ({}) exceeds trade.max_offer_items ({})",
            config.trade.visible_slot_cap, config.trade.max_offer_items
        )));
    }
    if config.trade.countdown_start < 0 || config.trade.countdown_tick_ms == 0 {
        return Err(TradeError::Configuration(
            "countdown must start at zero or above with a non-zero tick".to_string(),
        ));
    }
    Ok(())
}
