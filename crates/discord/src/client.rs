//! WebSocket client for the Discord gateway.
//!
//! [`GatewayClient`] holds the gateway URL. Call
//! [`GatewayClient::connect`] to open a live [`GatewayConnection`].

use tokio_tungstenite::{connect_async, MaybeTlsStream};

/// Public gateway endpoint, API v10 with JSON encoding.
pub const DEFAULT_GATEWAY_URL: &str = "wss://gateway.discord.gg/?v=10&encoding=json";

/// The raw gateway WebSocket stream.
pub type GatewayStream =
    tokio_tungstenite::WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Configuration handle for the gateway endpoint.
pub struct GatewayClient {
    url: String,
}

/// A live WebSocket connection to the gateway.
#[derive(Debug)]
pub struct GatewayConnection {
    pub ws_stream: GatewayStream,
}

impl Default for GatewayClient {
    fn default() -> Self {
        Self::new(DEFAULT_GATEWAY_URL.to_string())
    }
}

impl GatewayClient {
    pub fn new(url: String) -> Self {
        Self { url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Open the WebSocket. The session handshake is done by
    /// [`run_session`](crate::session::run_session).
    pub async fn connect(&self) -> Result<GatewayConnection, GatewayError> {
        let (ws_stream, _response) = connect_async(&self.url).await.map_err(|e| {
            GatewayError::Connection(format!("Failed to connect to gateway at {}: {e}", self.url))
        })?;

        tracing::info!(url = %self.url, "Connected to Discord gateway");

        Ok(GatewayConnection { ws_stream })
    }
}

/// Errors that can occur on the gateway connection.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Failed to establish the initial WebSocket connection.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server violated the expected handshake.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The server stopped acknowledging heartbeats.
    #[error("Heartbeat not acknowledged")]
    HeartbeatTimeout,

    /// Reading or writing a frame failed.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The interaction consumer went away.
    #[error("Interaction channel closed")]
    ChannelClosed,
}
