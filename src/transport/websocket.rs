//! WebSocket transport to the room server

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tokio_tungstenite::{
    connect_async, tungstenite::protocol::Message, MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use super::messages::{encode_command, parse_message, ServerFrame, PING};
use crate::common::errors::{Result, TradeError};
use crate::common::traits::TradeTransport;
use crate::common::types::{InboundEvent, OutboundCommand};
use crate::config::types::TransportConfig;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket transport carrying trade commands and events as JSON text frames
pub struct WebSocketTransport {
    /// Room server URL
    url: Url,
    /// Keepalive interval in seconds
    heartbeat_interval: u64,
    /// Connected state flag
    is_connected: Arc<AtomicBool>,
    /// Stream established by `connect`, consumed by `start`
    stream: Option<WsStream>,
    /// Reader and writer tasks
    tasks: Vec<JoinHandle<()>>,
}

impl WebSocketTransport {
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            url: Url::parse(url)?,
            heartbeat_interval: 10,
            is_connected: Arc::new(AtomicBool::new(false)),
            stream: None,
            tasks: Vec::new(),
        })
    }

    pub fn from_config(config: &TransportConfig) -> Result<Self> {
        Self::new(&config.websocket_url)
    }

    /// Set the keepalive interval
    pub fn with_heartbeat_interval(mut self, seconds: u64) -> Self {
        self.heartbeat_interval = seconds.max(1);
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn spawn_writer(
        &mut self,
        mut write: futures_util::stream::SplitSink<WsStream, Message>,
        mut commands: mpsc::Receiver<OutboundCommand>,
    ) {
        let heartbeat_interval = self.heartbeat_interval;
        let is_connected = self.is_connected.clone();

        self.tasks.push(tokio::spawn(async move {
            let mut ping_interval = interval(Duration::from_secs(heartbeat_interval));

            loop {
                tokio::select! {
                    command = commands.recv() => {
                        let Some(command) = command else {
                            debug!("Command channel closed, closing socket");
                            let _ = write.send(Message::Close(None)).await;
                            break;
                        };

                        let text = match encode_command(&command) {
                            Ok(text) => text,
                            Err(e) => {
                                error!("Failed to encode command {:?}: {}", command, e);
                                continue;
                            }
                        };

                        debug!("Sending command: {}", text);
                        if let Err(e) = write.send(Message::Text(text)).await {
                            error!("Failed to send command: {}", e);
                            is_connected.store(false, Ordering::SeqCst);
                            break;
                        }
                    }
                    _ = ping_interval.tick() => {
                        if !is_connected.load(Ordering::SeqCst) {
                            break;
                        }
                        if let Err(e) = write.send(Message::Text(PING.to_string())).await {
                            warn!("Failed to send keepalive: {}", e);
                        }
                    }
                }
            }
        }));
    }

    fn spawn_reader(
        &mut self,
        mut read: futures_util::stream::SplitStream<WsStream>,
        events: mpsc::Sender<InboundEvent>,
    ) {
        let is_connected = self.is_connected.clone();

        self.tasks.push(tokio::spawn(async move {
            while let Some(msg) = read.next().await {
                match msg {
                    Ok(Message::Text(text)) => match parse_message(&text) {
                        Ok(ServerFrame::Pong) => debug!("Received PONG"),
                        Ok(ServerFrame::Event(event)) => {
                            if let Err(e) = events.send(event).await {
                                error!("Failed to forward event: {}", e);
                                break;
                            }
                        }
                        Err(e) => warn!("Failed to parse message: {} - {}", e, text),
                    },
                    Ok(Message::Ping(_)) => {
                        // tungstenite answers pings on the next write
                        debug!("Received Ping");
                    }
                    Ok(Message::Close(frame)) => {
                        info!("WebSocket closed: {:?}", frame);
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!("WebSocket error: {}", e);
                        break;
                    }
                }
            }

            // Dropping `events` here ends the desk loop.
            is_connected.store(false, Ordering::SeqCst);
            info!("WebSocket reader stopped");
        }));
    }
}

#[async_trait]
impl TradeTransport for WebSocketTransport {
    #[instrument(skip(self))]
    async fn connect(&mut self) -> Result<()> {
        info!("Connecting to room server: {}", self.url);

        let (ws_stream, _response) = connect_async(self.url.as_str())
            .await
            .map_err(|e| TradeError::WebSocketConnection(e.to_string()))?;

        self.stream = Some(ws_stream);
        self.is_connected.store(true, Ordering::SeqCst);
        info!("WebSocket connection established");
        Ok(())
    }

    #[instrument(skip(self, events, commands))]
    async fn start(
        &mut self,
        events: mpsc::Sender<InboundEvent>,
        commands: mpsc::Receiver<OutboundCommand>,
    ) -> Result<()> {
        let stream = self
            .stream
            .take()
            .ok_or_else(|| TradeError::NotConnected(self.url.to_string()))?;

        let (write, read) = stream.split();
        self.spawn_writer(write, commands);
        self.spawn_reader(read, events);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn disconnect(&mut self) -> Result<()> {
        self.is_connected.store(false, Ordering::SeqCst);
        for task in self.tasks.drain(..) {
            task.abort();
        }
        self.stream = None;
        info!("Disconnected from room server");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.is_connected.load(Ordering::SeqCst)
    }

    fn transport_name(&self) -> &'static str {
        "websocket"
    }
}

impl Drop for WebSocketTransport {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}
