use std::time::Duration;

use renderq_core::error::CoreError;

use crate::commands::{Command, CommandParseError};
use crate::lifecycle::LifecycleError;
use crate::replies::{self, Reply};

/// Command-level error type.
///
/// Every failure a command can hit ends up here and is turned into a
/// [`Reply`] by [`BotError::into_reply`]; nothing escapes the command
/// boundary.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Parse(#[from] CommandParseError),

    /// The invoking member lacks the permission for a staff command.
    #[error("Missing permission for '{0}'")]
    Forbidden(&'static str),

    #[error("Command did not finish within {0:?}")]
    Timeout(Duration),
}

impl BotError {
    /// Convert into the reply shown to the user, logging as appropriate.
    ///
    /// `command` is the parsed command, when parsing got that far; a
    /// failed submit gets its own text.
    pub fn into_reply(self, command: Option<&Command>) -> Reply {
        match self {
            BotError::Lifecycle(LifecycleError::Core(core)) => match core {
                CoreError::NotFound { id, .. } => replies::not_found(id),
                CoreError::InvalidTransition { id, from, to } => {
                    replies::invalid_transition(id, from, to)
                }
            },
            BotError::Lifecycle(LifecycleError::Store(err)) => {
                tracing::error!(error = %err, command = command.map(Command::name), "Store error");
                match command {
                    Some(Command::Submit { .. }) => Reply::ephemeral(replies::SAVE_FAILED),
                    _ => Reply::public(replies::GENERIC_FAILURE),
                }
            }
            BotError::Parse(err) => {
                tracing::warn!(error = %err, "Rejected interaction");
                Reply::ephemeral(replies::UNKNOWN_COMMAND)
            }
            BotError::Forbidden(name) => {
                tracing::warn!(command = name, "Permission denied");
                Reply::ephemeral(replies::FORBIDDEN)
            }
            BotError::Timeout(limit) => {
                tracing::error!(?limit, command = command.map(Command::name), "Command timed out");
                Reply::public(replies::GENERIC_FAILURE)
            }
        }
    }
}
