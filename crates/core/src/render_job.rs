//! Render job lifecycle states and the transitions allowed between them.
//!
//! A job moves strictly forward: `Pending -> InProgress -> Complete`.
//! Statuses are persisted as the text literals returned by
//! [`RenderJobStatus::as_str`]; anything else is rejected on decode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stored text for a job waiting to be claimed.
pub const STATUS_PENDING: &str = "pending";

/// Stored text for a claimed job.
pub const STATUS_IN_PROGRESS: &str = "in-progress";

/// Stored text for a finished job.
pub const STATUS_COMPLETE: &str = "complete";

/// Lifecycle status of a render job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderJobStatus {
    Pending,
    InProgress,
    Complete,
}

impl RenderJobStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [RenderJobStatus; 3] = [Self::Pending, Self::InProgress, Self::Complete];

    /// The text stored in the `renders.status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::InProgress => STATUS_IN_PROGRESS,
            Self::Complete => STATUS_COMPLETE,
        }
    }

    /// Whether the job still shows up in the staff queue.
    pub fn is_open(self) -> bool {
        self != Self::Complete
    }

    /// Whether a job in this status may move to `next`.
    ///
    /// Only single forward steps are allowed; `Complete` is terminal.
    pub fn can_transition_to(self, next: RenderJobStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress) | (Self::InProgress, Self::Complete)
        )
    }

    /// The status a job must be in before it can enter `self`.
    ///
    /// Returns `None` for `Pending`, which is only entered on submit.
    pub fn required_predecessor(self) -> Option<RenderJobStatus> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.can_transition_to(self))
    }
}

impl fmt::Display for RenderJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status column held text that is not one of the known literals.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown render job status '{0}'")]
pub struct ParseStatusError(pub String);

impl FromStr for RenderJobStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PENDING => Ok(Self::Pending),
            STATUS_IN_PROGRESS => Ok(Self::InProgress),
            STATUS_COMPLETE => Ok(Self::Complete),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl TryFrom<String> for RenderJobStatus {
    type Error = ParseStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
