//! Gateway session loop.
//!
//! Runs one session on an open connection: wait for `HELLO`, send
//! `IDENTIFY`, then heartbeat on the server-given interval while
//! forwarding slash-command interactions to an `mpsc` channel. The
//! session ends on close, `RECONNECT`, `INVALID_SESSION`, a missed
//! heartbeat ack, or cancellation. Resuming is left to the caller.

use std::time::Duration;

use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_util::sync::CancellationToken;

use crate::client::GatewayError;
use crate::messages::{
    heartbeat_frame, identify_frame, parse_frame, GatewayEvent, Interaction,
};

/// Credentials and intents sent in `IDENTIFY`.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub token: String,
    pub intents: u64,
}

/// Why a session ended without a transport error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    Cancelled,
    ReconnectRequested,
    InvalidSession,
    /// The socket closed, with the close code if one was sent.
    Closed { code: Option<u16> },
}

/// Drive a gateway session until it ends.
///
/// Generic over the socket so tests can run it against a local server.
pub async fn run_session<S>(
    ws: &mut S,
    config: &SessionConfig,
    interactions: &mpsc::Sender<Interaction>,
    cancel: &CancellationToken,
) -> Result<SessionEnd, GatewayError>
where
    S: Stream<Item = Result<Message, tungstenite::Error>>
        + Sink<Message, Error = tungstenite::Error>
        + Unpin,
{
    let heartbeat_interval = tokio::select! {
        _ = cancel.cancelled() => return Ok(SessionEnd::Cancelled),
        interval = wait_for_hello(ws) => interval?,
    };
    tracing::debug!(heartbeat_interval, "Received gateway HELLO");

    send_json(ws, &identify_frame(&config.token, config.intents)).await?;

    let mut heartbeat = tokio::time::interval(Duration::from_millis(heartbeat_interval));
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the first heartbeat is due
    // one full interval after IDENTIFY.
    heartbeat.tick().await;

    let mut seq: Option<u64> = None;
    let mut awaiting_ack = false;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = ws.send(Message::Close(None)).await;
                return Ok(SessionEnd::Cancelled);
            }
            _ = heartbeat.tick() => {
                if awaiting_ack {
                    return Err(GatewayError::HeartbeatTimeout);
                }
                send_json(ws, &heartbeat_frame(seq)).await?;
                awaiting_ack = true;
            }
            frame = ws.next() => {
                let text = match frame {
                    None => return Ok(SessionEnd::Closed { code: None }),
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(frame))) => {
                        let code = frame.map(|f| u16::from(f.code));
                        tracing::info!(?code, "Gateway closed the connection");
                        return Ok(SessionEnd::Closed { code });
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(e.into()),
                };

                let frame = match parse_frame(&text) {
                    Ok(frame) => frame,
                    Err(e) => {
                        tracing::warn!(error = %e, raw_message = %text, "Failed to parse gateway frame");
                        continue;
                    }
                };
                if frame.seq.is_some() {
                    seq = frame.seq;
                }

                match frame.event {
                    GatewayEvent::Ready(ready) => {
                        tracing::info!(
                            user_id = %ready.user.id,
                            session_id = %ready.session_id,
                            "Bot ingelogd als {}",
                            ready.user.username,
                        );
                    }
                    GatewayEvent::InteractionCreate(interaction) => {
                        if !interaction.is_command() {
                            tracing::debug!(kind = interaction.kind, "Ignoring non-command interaction");
                            continue;
                        }
                        interactions
                            .send(*interaction)
                            .await
                            .map_err(|_| GatewayError::ChannelClosed)?;
                    }
                    GatewayEvent::Heartbeat => {
                        send_json(ws, &heartbeat_frame(seq)).await?;
                        awaiting_ack = true;
                    }
                    GatewayEvent::HeartbeatAck => awaiting_ack = false,
                    GatewayEvent::Reconnect => return Ok(SessionEnd::ReconnectRequested),
                    GatewayEvent::InvalidSession { resumable } => {
                        tracing::warn!(resumable, "Gateway invalidated the session");
                        return Ok(SessionEnd::InvalidSession);
                    }
                    GatewayEvent::Dispatch { name } => {
                        tracing::trace!(event = %name, "Ignoring dispatch event");
                    }
                    GatewayEvent::Hello { .. } => {
                        tracing::debug!("Ignoring repeated HELLO");
                    }
                }
            }
        }
    }
}

/// Read frames until `HELLO` arrives and return its heartbeat interval.
async fn wait_for_hello<S>(ws: &mut S) -> Result<u64, GatewayError>
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(frame) = ws.next().await {
        let text = match frame? {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };
        match parse_frame(&text) {
            Ok(frame) => match frame.event {
                GatewayEvent::Hello { heartbeat_interval } => return Ok(heartbeat_interval),
                other => {
                    return Err(GatewayError::Protocol(format!(
                        "Expected HELLO, got {other:?}"
                    )))
                }
            },
            Err(e) => return Err(GatewayError::Protocol(e.to_string())),
        }
    }
    Err(GatewayError::Protocol(
        "Connection closed before HELLO".to_string(),
    ))
}

async fn send_json<S>(ws: &mut S, value: &serde_json::Value) -> Result<(), GatewayError>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    ws.send(Message::Text(value.to_string())).await?;
    Ok(())
}
