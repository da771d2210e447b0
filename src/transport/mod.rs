//! Transport module - WebSocket adapter to the room server

pub mod messages;
pub mod websocket;

pub use websocket::WebSocketTransport;
