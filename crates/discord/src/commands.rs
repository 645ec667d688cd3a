//! Slash-command definitions and interaction response bodies.

use serde::Serialize;

/// Application command option type: string.
pub const OPTION_STRING: u8 = 3;

/// Application command option type: integer.
pub const OPTION_INTEGER: u8 = 4;

/// Interaction callback type: reply with a channel message.
pub const CALLBACK_CHANNEL_MESSAGE: u8 = 4;

/// Message flag: only the invoking user sees the reply.
pub const FLAG_EPHEMERAL: u64 = 1 << 6;

/// A chat-input command as sent to the bulk-overwrite endpoint.
///
/// Built with [`CommandDefinition::new`] and the option/permission
/// builder methods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandDefinition {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDefinition>,
    /// Permission bitfield required by default, as a decimal string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_member_permissions: Option<String>,
}

/// One declared option of a command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionDefinition {
    #[serde(rename = "type")]
    pub kind: u8,
    pub name: String,
    pub description: String,
    pub required: bool,
}

impl CommandDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
            default_member_permissions: None,
        }
    }

    /// Add a required string option.
    pub fn string_option(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.option(OPTION_STRING, name, description)
    }

    /// Add a required integer option.
    pub fn integer_option(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.option(OPTION_INTEGER, name, description)
    }

    /// Hide the command from members lacking `permissions`.
    pub fn default_member_permissions(mut self, permissions: impl Into<String>) -> Self {
        self.default_member_permissions = Some(permissions.into());
        self
    }

    fn option(
        mut self,
        kind: u8,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.options.push(OptionDefinition {
            kind,
            name: name.into(),
            description: description.into(),
            required: true,
        });
        self
    }
}

/// Body of `POST /interactions/{id}/{token}/callback`.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    pub data: InteractionResponseData,
}

#[derive(Debug, Clone, Serialize)]
pub struct InteractionResponseData {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

impl InteractionResponse {
    /// A plain message reply, optionally visible only to the invoker.
    pub fn message(content: impl Into<String>, ephemeral: bool) -> Self {
        Self {
            kind: CALLBACK_CHANNEL_MESSAGE,
            data: InteractionResponseData {
                content: content.into(),
                flags: ephemeral.then_some(FLAG_EPHEMERAL),
            },
        }
    }
}
