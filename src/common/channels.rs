//! Channel type definitions for inter-task communication

use tokio::sync::mpsc;

use super::types::{InboundEvent, OutboundCommand, UserAction};
use crate::trade::countdown::CountdownTick;

/// Default channel buffer size
pub const DEFAULT_CHANNEL_SIZE: usize = 1000;

/// Create a channel carrying inbound events from the transport to the desk
pub fn create_event_channel_with_size(
    size: usize,
) -> (mpsc::Sender<InboundEvent>, mpsc::Receiver<InboundEvent>) {
    mpsc::channel(size)
}

/// Create a channel carrying outbound commands from the desk to the transport
pub fn create_command_channel(
    size: usize,
) -> (mpsc::Sender<OutboundCommand>, mpsc::Receiver<OutboundCommand>) {
    mpsc::channel(size)
}

/// Create a channel carrying local user actions into the desk
pub fn create_action_channel() -> (mpsc::Sender<UserAction>, mpsc::Receiver<UserAction>) {
    mpsc::channel(DEFAULT_CHANNEL_SIZE)
}

/// Create the countdown tick channel
///
/// Only one countdown runs at a time, so a small buffer is enough.
pub fn create_tick_channel() -> (mpsc::Sender<CountdownTick>, mpsc::Receiver<CountdownTick>) {
    mpsc::channel(8)
}
