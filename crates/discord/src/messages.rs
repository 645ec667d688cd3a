//! Discord gateway frame types and parser.
//!
//! Every gateway frame has the shape `{"op": <u8>, "d": ..., "s": <seq>, "t": <name>}`.
//! Dispatch frames (op 0) carry an event name in `t`; only the events
//! the bot reacts to are decoded, everything else is kept as
//! [`GatewayEvent::Dispatch`] with its name.

use renderq_core::permissions::parse_bitfield;
use serde::Deserialize;

/// Gateway opcodes used by the session loop.
pub mod opcode {
    pub const DISPATCH: u8 = 0;
    pub const HEARTBEAT: u8 = 1;
    pub const IDENTIFY: u8 = 2;
    pub const RECONNECT: u8 = 7;
    pub const INVALID_SESSION: u8 = 9;
    pub const HELLO: u8 = 10;
    pub const HEARTBEAT_ACK: u8 = 11;
}

/// `GUILDS` gateway intent. Slash-command interactions need no more.
pub const INTENT_GUILDS: u64 = 1 << 0;

/// Interaction type for slash-command invocations.
pub const INTERACTION_APPLICATION_COMMAND: u8 = 2;

/// Raw frame as it arrives on the socket.
#[derive(Debug, Deserialize)]
struct RawFrame {
    op: u8,
    #[serde(default)]
    d: serde_json::Value,
    s: Option<u64>,
    t: Option<String>,
}

/// A decoded gateway frame: the event plus the sequence number to echo
/// back in heartbeats.
#[derive(Debug)]
pub struct GatewayFrame {
    pub seq: Option<u64>,
    pub event: GatewayEvent,
}

/// All gateway events the session loop distinguishes.
#[derive(Debug)]
pub enum GatewayEvent {
    /// First frame after connecting; tells us how often to heartbeat.
    Hello { heartbeat_interval: u64 },
    /// Session established.
    Ready(ReadyData),
    /// A user invoked one of our commands.
    InteractionCreate(Box<Interaction>),
    /// Any other dispatch event, by name.
    Dispatch { name: String },
    /// The server asks for an immediate heartbeat.
    Heartbeat,
    HeartbeatAck,
    /// The server asks us to reconnect.
    Reconnect,
    InvalidSession { resumable: bool },
}

#[derive(Debug, Clone, Deserialize)]
struct HelloData {
    heartbeat_interval: u64,
}

/// Payload of the `READY` dispatch.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadyData {
    pub user: User,
    pub session_id: String,
}

/// A Discord user.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
}

/// A guild member invoking an interaction.
#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub user: User,
    /// Resolved permission bitfield in the interaction's channel.
    pub permissions: Option<String>,
}

/// An `INTERACTION_CREATE` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    pub id: String,
    pub application_id: String,
    #[serde(rename = "type")]
    pub kind: u8,
    pub token: String,
    pub guild_id: Option<String>,
    /// Present for guild invocations.
    pub member: Option<Member>,
    /// Present for DM invocations.
    pub user: Option<User>,
    pub data: Option<CommandData>,
}

/// Slash-command name and supplied options.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandData {
    pub name: String,
    #[serde(default)]
    pub options: Vec<CommandOptionValue>,
}

/// A single option value supplied by the user.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandOptionValue {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
    pub value: Option<serde_json::Value>,
}

impl Interaction {
    /// Whether this is a slash-command invocation.
    pub fn is_command(&self) -> bool {
        self.kind == INTERACTION_APPLICATION_COMMAND && self.data.is_some()
    }

    /// Invoked command name, if any.
    pub fn command_name(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.name.as_str())
    }

    /// The invoking user, whether in a guild or a DM.
    pub fn invoker(&self) -> Option<&User> {
        self.member
            .as_ref()
            .map(|m| &m.user)
            .or(self.user.as_ref())
    }

    /// The member's permission bitfield. `None` outside a guild.
    pub fn member_permissions(&self) -> Option<u64> {
        self.member
            .as_ref()
            .and_then(|m| m.permissions.as_deref())
            .and_then(parse_bitfield)
    }

    fn option(&self, name: &str) -> Option<&serde_json::Value> {
        self.data
            .as_ref()?
            .options
            .iter()
            .find(|o| o.name == name)?
            .value
            .as_ref()
    }

    /// A string option by name.
    pub fn string_option(&self, name: &str) -> Option<&str> {
        self.option(name)?.as_str()
    }

    /// An integer option by name.
    pub fn integer_option(&self, name: &str) -> Option<i64> {
        self.option(name)?.as_i64()
    }
}

/// Errors from decoding a gateway frame.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("Malformed gateway frame: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown gateway opcode {0}")]
    UnknownOpcode(u8),

    #[error("Dispatch frame without event name")]
    MissingEventName,
}

/// Parse a gateway text frame into a typed event.
pub fn parse_frame(text: &str) -> Result<GatewayFrame, MessageError> {
    let raw: RawFrame = serde_json::from_str(text)?;

    let event = match raw.op {
        opcode::DISPATCH => {
            let name = raw.t.ok_or(MessageError::MissingEventName)?;
            match name.as_str() {
                "READY" => GatewayEvent::Ready(serde_json::from_value(raw.d)?),
                "INTERACTION_CREATE" => {
                    GatewayEvent::InteractionCreate(Box::new(serde_json::from_value(raw.d)?))
                }
                _ => GatewayEvent::Dispatch { name },
            }
        }
        opcode::HEARTBEAT => GatewayEvent::Heartbeat,
        opcode::RECONNECT => GatewayEvent::Reconnect,
        opcode::INVALID_SESSION => GatewayEvent::InvalidSession {
            resumable: raw.d.as_bool().unwrap_or(false),
        },
        opcode::HELLO => {
            let hello: HelloData = serde_json::from_value(raw.d)?;
            GatewayEvent::Hello {
                heartbeat_interval: hello.heartbeat_interval,
            }
        }
        opcode::HEARTBEAT_ACK => GatewayEvent::HeartbeatAck,
        other => return Err(MessageError::UnknownOpcode(other)),
    };

    Ok(GatewayFrame { seq: raw.s, event })
}

/// Build the `IDENTIFY` frame.
pub fn identify_frame(token: &str, intents: u64) -> serde_json::Value {
    serde_json::json!({
        "op": opcode::IDENTIFY,
        "d": {
            "token": token,
            "intents": intents,
            "properties": {
                "os": std::env::consts::OS,
                "browser": "renderq",
                "device": "renderq",
            },
        },
    })
}

/// Build a heartbeat frame echoing the last received sequence number.
pub fn heartbeat_frame(seq: Option<u64>) -> serde_json::Value {
    serde_json::json!({ "op": opcode::HEARTBEAT, "d": seq })
}
