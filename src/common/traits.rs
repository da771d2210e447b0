//! Trait definitions for the collaborators around the trade core

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::warn;

use super::errors::Result;
use super::types::{Advisory, InboundEvent, OutboundCommand};

/// Trait for the message transport between the client and the room server
///
/// The trade core never talks to the transport directly: commands are
/// fire-and-forget through a channel and results come back as events.
#[async_trait]
pub trait TradeTransport: Send + Sync {
    /// Connect to the room server
    async fn connect(&mut self) -> Result<()>;

    /// Start pumping messages in both directions
    ///
    /// Spawns internal tasks that forward parsed server messages to `events`
    /// and encode everything received on `commands`.
    ///
    /// # Arguments
    /// * `events` - Channel sender for inbound events
    /// * `commands` - Channel receiver for outbound commands
    async fn start(
        &mut self,
        events: mpsc::Sender<InboundEvent>,
        commands: mpsc::Receiver<OutboundCommand>,
    ) -> Result<()>;

    /// Gracefully disconnect
    async fn disconnect(&mut self) -> Result<()>;

    /// Check if the transport is currently connected
    fn is_connected(&self) -> bool;

    /// Name used in log lines
    fn transport_name(&self) -> &'static str;
}

/// Surface for user-visible advisories (toasts, alerts)
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send {
    fn notify(&self, advisory: Advisory);
}

/// Notifier that only writes advisories to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, advisory: Advisory) {
        warn!(
            title = advisory.title_key(),
            description = advisory.description_key(),
            "Trade advisory"
        );
    }
}
