//! InventoryTrade - Main Entry Point
//!
//! Connects to a room server and drives trades from line commands on stdin.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use inventory_trade::common::channels::{
    create_action_channel, create_command_channel, create_event_channel_with_size,
};
use inventory_trade::config::{load_config, load_from_env};
use inventory_trade::{GroupKey, LogNotifier, TradeDesk, TradeTransport, UserAction, WebSocketTransport};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Room server WebSocket URL (overrides the configuration file)
    #[arg(long, env = "TRADE_WS_URL")]
    url: Option<String>,
}

/// Parse one stdin line into a user action
///
/// `select <group>`, `offer [count]`, `remove <group>`, `progress`, `cancel`.
/// Groups are stacking keys, or `#<item id>` for single items.
fn parse_action(line: &str) -> Option<UserAction> {
    let mut parts = line.split_whitespace();
    let verb = parts.next()?;
    let argument = parts.next();

    match (verb, argument) {
        ("select", Some(group)) => group.parse::<GroupKey>().ok().map(UserAction::SelectGroup),
        ("offer", None) => Some(UserAction::OfferSelected { count: 1 }),
        ("offer", Some(count)) => count
            .parse()
            .ok()
            .map(|count| UserAction::OfferSelected { count }),
        ("remove", Some(group)) => group.parse::<GroupKey>().ok().map(UserAction::RemoveFromOffer),
        ("progress", None) | ("accept", None) => Some(UserAction::Progress),
        ("cancel", None) => Some(UserAction::Cancel),
        _ => None,
    }
}

async fn forward_stdin(actions: mpsc::Sender<UserAction>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        match parse_action(&line) {
            Some(action) => {
                if actions.send(action).await.is_err() {
                    break;
                }
            }
            None => warn!("Unrecognised command: {}", line.trim()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let mut config = if Path::new(&args.config).exists() {
        load_config(Some(&args.config)).context("loading configuration file")?
    } else {
        load_from_env().context("loading configuration from environment")?
    };
    if let Some(url) = args.url {
        config.transport.websocket_url = url;
    }

    let log_level = args
        .log_level
        .unwrap_or_else(|| config.settings.log_level.clone());
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting InventoryTrade client");
    info!("Configuration file: {}", args.config);
    info!("Room server: {}", config.transport.websocket_url);

    let (event_tx, event_rx) = create_event_channel_with_size(config.transport.channel_size);
    let (command_tx, command_rx) = create_command_channel(config.transport.channel_size);
    let (action_tx, action_rx) = create_action_channel();

    let mut transport = WebSocketTransport::from_config(&config.transport)?
        .with_heartbeat_interval(config.settings.heartbeat_interval_seconds);
    transport.connect().await?;
    transport.start(event_tx, command_rx).await?;

    let (desk, tick_rx) = TradeDesk::with_interval_ticks(config.trade.clone(), command_tx, LogNotifier);
    let desk_task = tokio::spawn(desk.run(event_rx, action_rx, tick_rx));
    let stdin_task = tokio::spawn(forward_stdin(action_tx));

    info!("Client initialized, reading trade commands from stdin");

    tokio::select! {
        result = desk_task => {
            result.context("trade desk task panicked")??;
            info!("Room server connection ended");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal, cleaning up...");
        }
    }

    stdin_task.abort();
    transport.disconnect().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_trade::StackingKey;

    #[test]
    fn test_parse_actions() {
        assert_eq!(
            parse_action("select S18"),
            Some(UserAction::SelectGroup(GroupKey::Stack(StackingKey::from("S18"))))
        );
        assert_eq!(
            parse_action("remove #42"),
            Some(UserAction::RemoveFromOffer(GroupKey::Single(42)))
        );
        assert_eq!(parse_action("offer"), Some(UserAction::OfferSelected { count: 1 }));
        assert_eq!(parse_action("offer 5"), Some(UserAction::OfferSelected { count: 5 }));
        assert_eq!(parse_action("  progress "), Some(UserAction::Progress));
        assert_eq!(parse_action("offer many"), None);
        assert_eq!(parse_action("select"), None);
        assert_eq!(parse_action(""), None);
    }
}
