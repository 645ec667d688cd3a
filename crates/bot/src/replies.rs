//! Reply texts sent back to Discord users.

use renderq_core::render_job::RenderJobStatus;
use renderq_core::types::DbId;
use renderq_db::models::render_job::RenderJob;
use renderq_discord::commands::InteractionResponse;

/// Discord rejects message content longer than this.
pub const MAX_MESSAGE_CHARS: usize = 2000;

pub const SAVE_FAILED: &str = "Fout bij opslaan.";
pub const GENERIC_FAILURE: &str = "Fout.";
pub const NO_OPEN_JOBS: &str = "Geen open jobs.";
pub const FORBIDDEN: &str = "Je hebt geen toestemming voor dit commando.";
pub const UNKNOWN_COMMAND: &str = "Onbekend commando.";

/// The outcome of one command, ready to be sent as an interaction response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    /// Only visible to the invoking user.
    pub ephemeral: bool,
}

impl Reply {
    pub fn public(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: false,
        }
    }

    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
        }
    }
}

impl From<Reply> for InteractionResponse {
    fn from(reply: Reply) -> Self {
        InteractionResponse::message(reply.content, reply.ephemeral)
    }
}

pub fn submitted(id: DbId) -> Reply {
    Reply::public(format!("Renderjob aangemaakt! ID **{id}**"))
}

pub fn claimed(id: DbId) -> Reply {
    Reply::public(format!("Job **{id}** is geclaimd."))
}

pub fn completed(id: DbId, result_url: &str) -> Reply {
    Reply::public(format!("Job **{id}** voltooid! Resultaat: {result_url}"))
}

pub fn not_found(id: DbId) -> Reply {
    Reply::ephemeral(format!("Job **{id}** bestaat niet."))
}

pub fn invalid_transition(id: DbId, from: RenderJobStatus, to: RenderJobStatus) -> Reply {
    Reply::ephemeral(format!("Job **{id}** is {from} en kan niet naar {to}."))
}

/// Render the open-job listing, one line per job.
///
/// Lines that would push the message past [`MAX_MESSAGE_CHARS`] are
/// replaced by a single `… en {n} meer` line.
pub fn queue(jobs: &[RenderJob]) -> Reply {
    if jobs.is_empty() {
        return Reply::public(NO_OPEN_JOBS);
    }

    let lines: Vec<String> = jobs.iter().map(queue_line).collect();
    let full = lines.join("\n");
    if full.chars().count() <= MAX_MESSAGE_CHARS {
        return Reply::public(full);
    }

    // Reserve room for the widest possible overflow line plus its newline.
    let reserve = overflow_line(lines.len()).chars().count() + 1;
    let mut content = String::new();
    let mut used = 0;
    let mut kept = 0;

    for line in &lines {
        let sep = usize::from(kept > 0);
        let len = line.chars().count();
        if used + sep + len + reserve > MAX_MESSAGE_CHARS {
            break;
        }
        if sep == 1 {
            content.push('\n');
        }
        content.push_str(line);
        used += sep + len;
        kept += 1;
    }

    if kept > 0 {
        content.push('\n');
    }
    content.push_str(&overflow_line(lines.len() - kept));
    Reply::public(content)
}

fn queue_line(job: &RenderJob) -> String {
    format!(
        "ID: {} — {} — Status: {}",
        job.id,
        job.description.as_deref().unwrap_or("-"),
        job.status
    )
}

fn overflow_line(remaining: usize) -> String {
    format!("… en {remaining} meer")
}
