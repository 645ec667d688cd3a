//! Routes parsed interactions to the lifecycle controller.
//!
//! Each interaction is handled in its own task: parse, permission check,
//! one bounded controller call, then exactly one reply through an
//! [`InteractionResponder`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use renderq_core::permissions::{has_permission, MANAGE_GUILD};
use renderq_discord::api::{DiscordApi, DiscordApiError};
use renderq_discord::messages::Interaction;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::commands::{Command, CommandParseError};
use crate::error::BotError;
use crate::lifecycle::JobLifecycle;
use crate::replies::{self, Reply};

/// Delivers a reply for an interaction back to the platform.
#[async_trait]
pub trait InteractionResponder: Send + Sync {
    async fn respond(&self, interaction: &Interaction, reply: Reply) -> Result<(), DiscordApiError>;
}

#[async_trait]
impl InteractionResponder for DiscordApi {
    async fn respond(&self, interaction: &Interaction, reply: Reply) -> Result<(), DiscordApiError> {
        self.create_interaction_response(&interaction.id, &interaction.token, &reply.into())
            .await
    }
}

#[derive(Clone)]
pub struct CommandRouter {
    lifecycle: JobLifecycle,
    command_timeout: Duration,
}

impl CommandRouter {
    pub fn new(lifecycle: JobLifecycle, command_timeout: Duration) -> Self {
        Self {
            lifecycle,
            command_timeout,
        }
    }

    /// Turn one interaction into a reply. Never fails; errors become replies.
    pub async fn dispatch(&self, interaction: &Interaction) -> Reply {
        let command = match Command::parse(interaction) {
            Ok(command) => command,
            Err(err) => return BotError::from(err).into_reply(None),
        };

        match self.execute(interaction, &command).await {
            Ok(reply) => reply,
            Err(err) => err.into_reply(Some(&command)),
        }
    }

    /// Dispatch and send the reply through `responder`.
    pub async fn handle(&self, interaction: Interaction, responder: &dyn InteractionResponder) {
        let started = Instant::now();
        let reply = self.dispatch(&interaction).await;

        tracing::debug!(
            command = interaction.command_name(),
            interaction_id = %interaction.id,
            ephemeral = reply.ephemeral,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Command handled",
        );

        if let Err(e) = responder.respond(&interaction, reply).await {
            tracing::error!(
                interaction_id = %interaction.id,
                error = %e,
                "Failed to send interaction response",
            );
        }
    }

    async fn execute(&self, interaction: &Interaction, command: &Command) -> Result<Reply, BotError> {
        if command.requires_staff() {
            let granted = interaction
                .member_permissions()
                .is_some_and(|bits| has_permission(bits, MANAGE_GUILD));
            if !granted {
                return Err(BotError::Forbidden(command.name()));
            }
        }

        let actor_id = interaction
            .invoker()
            .map(|user| user.id.as_str())
            .ok_or(CommandParseError::MissingInvoker)?;

        if command.is_read_only() {
            return tokio::time::timeout(self.command_timeout, self.run(command, actor_id))
                .await
                .map_err(|_| BotError::Timeout(self.command_timeout))?;
        }

        // A write is never abandoned once issued; the store's own acquire
        // and busy timeouts bound it, and a write that fails changes nothing.
        self.run(command, actor_id).await
    }

    async fn run(&self, command: &Command, actor_id: &str) -> Result<Reply, BotError> {
        let reply = match command {
            Command::Submit { description } => {
                let job = self.lifecycle.submit_job(actor_id, description).await?;
                replies::submitted(job.id)
            }
            Command::Queue => replies::queue(&self.lifecycle.list_open_jobs().await?),
            Command::Claim { job_id } => {
                let job = self.lifecycle.claim_job(*job_id, actor_id).await?;
                replies::claimed(job.id)
            }
            Command::Complete { job_id, result_url } => {
                let job = self.lifecycle.complete_job(*job_id, result_url).await?;
                replies::completed(job.id, result_url)
            }
        };
        Ok(reply)
    }
}

/// Consume interactions until the channel closes or `cancel` fires,
/// handling each one in its own task.
///
/// On cancellation the channel is closed and everything already buffered
/// is still handled, so every accepted interaction gets a reply. In-flight
/// tasks are drained before returning.
pub async fn serve_interactions(
    mut interactions: mpsc::Receiver<Interaction>,
    router: CommandRouter,
    responder: Arc<dyn InteractionResponder>,
    cancel: CancellationToken,
) {
    let mut tasks = JoinSet::new();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Interaction handler shutting down");
                interactions.close();
                while let Some(interaction) = interactions.recv().await {
                    spawn_handler(&mut tasks, &router, &responder, interaction);
                }
                break;
            }
            received = interactions.recv() => {
                let Some(interaction) = received else { break };
                spawn_handler(&mut tasks, &router, &responder, interaction);
            }
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                log_join(joined);
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        log_join(joined);
    }
}

fn spawn_handler(
    tasks: &mut JoinSet<()>,
    router: &CommandRouter,
    responder: &Arc<dyn InteractionResponder>,
    interaction: Interaction,
) {
    let router = router.clone();
    let responder = Arc::clone(responder);
    tasks.spawn(async move {
        router.handle(interaction, responder.as_ref()).await;
    });
}

fn log_join(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        tracing::error!(error = %e, "Command task panicked");
    }
}
