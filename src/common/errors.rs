//! Error types for the application

use thiserror::Error;

/// Result type alias using our TradeError
pub type Result<T> = std::result::Result<T, TradeError>;

/// Main error type for transport and wiring operations
///
/// Negotiation outcomes (policy rejections, stale selections, desyncs)
/// are not errors; they are reported as values or log lines.
#[derive(Error, Debug)]
pub enum TradeError {
    /// WebSocket connection errors
    #[error("WebSocket connection error: {0}")]
    WebSocketConnection(String),

    /// WebSocket send/receive errors
    #[error("WebSocket communication error: {0}")]
    WebSocketCommunication(String),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Malformed endpoint URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport used before `connect`
    #[error("Transport not connected: {0}")]
    NotConnected(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for TradeError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        TradeError::WebSocketCommunication(err.to_string())
    }
}
