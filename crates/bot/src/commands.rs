//! Slash commands: the definitions registered with Discord and the typed
//! [`Command`] parsed from each incoming interaction.

use renderq_core::permissions::staff_permission_string;
use renderq_core::types::DbId;
use renderq_discord::commands::CommandDefinition;
use renderq_discord::messages::Interaction;

pub const SUBMIT_RENDER: &str = "submit-render";
pub const QUEUE: &str = "queue";
pub const CLAIM: &str = "claim";
pub const COMPLETE: &str = "complete";

const OPT_DESCRIPTION: &str = "description";
const OPT_JOB_ID: &str = "job_id";
const OPT_RESULT_URL: &str = "result_url";

/// The guild command set, in registration order.
pub fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(SUBMIT_RENDER, "Stuur een renderjob in")
            .string_option(OPT_DESCRIPTION, "Job beschrijving"),
        CommandDefinition::new(QUEUE, "Toon openstaande renderjobs (staff)")
            .default_member_permissions(staff_permission_string()),
        CommandDefinition::new(CLAIM, "Claim een renderjob (staff)")
            .integer_option(OPT_JOB_ID, "Job ID")
            .default_member_permissions(staff_permission_string()),
        CommandDefinition::new(COMPLETE, "Markeer een renderjob als voltooid")
            .integer_option(OPT_JOB_ID, "Job ID")
            .string_option(OPT_RESULT_URL, "Resultaat link")
            .default_member_permissions(staff_permission_string()),
    ]
}

/// A parsed slash-command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit { description: String },
    Queue,
    Claim { job_id: DbId },
    Complete { job_id: DbId, result_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandParseError {
    #[error("Interaction carries no command data")]
    NotACommand,

    #[error("Unknown command '{0}'")]
    Unknown(String),

    #[error("Missing or invalid option '{option}' for '{command}'")]
    MissingOption {
        command: &'static str,
        option: &'static str,
    },

    #[error("Interaction has no invoking user")]
    MissingInvoker,
}

impl Command {
    /// Parse the command name and options of an interaction.
    pub fn parse(interaction: &Interaction) -> Result<Self, CommandParseError> {
        let name = interaction
            .command_name()
            .ok_or(CommandParseError::NotACommand)?;

        let string = |command, option| {
            interaction
                .string_option(option)
                .map(str::to_string)
                .ok_or(CommandParseError::MissingOption { command, option })
        };
        let integer = |command, option| {
            interaction
                .integer_option(option)
                .ok_or(CommandParseError::MissingOption { command, option })
        };

        match name {
            SUBMIT_RENDER => Ok(Self::Submit {
                description: string(SUBMIT_RENDER, OPT_DESCRIPTION)?,
            }),
            QUEUE => Ok(Self::Queue),
            CLAIM => Ok(Self::Claim {
                job_id: integer(CLAIM, OPT_JOB_ID)?,
            }),
            COMPLETE => Ok(Self::Complete {
                job_id: integer(COMPLETE, OPT_JOB_ID)?,
                result_url: string(COMPLETE, OPT_RESULT_URL)?,
            }),
            other => Err(CommandParseError::Unknown(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Submit { .. } => SUBMIT_RENDER,
            Self::Queue => QUEUE,
            Self::Claim { .. } => CLAIM,
            Self::Complete { .. } => COMPLETE,
        }
    }

    /// Only reads the store, so it may be cut off by the command timeout.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::Queue)
    }

    /// Staff commands need `MANAGE_GUILD`.
    pub fn requires_staff(&self) -> bool {
        !matches!(self, Self::Submit { .. })
    }
}
