//! REST API client for the Discord HTTP endpoints.
//!
//! Wraps the two calls the bot needs (guild command registration and
//! interaction replies) using [`reqwest`].

use serde::Deserialize;

use crate::commands::{CommandDefinition, InteractionResponse};

/// Versioned Discord REST base URL.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// HTTP client bound to one bot token.
#[derive(Clone)]
pub struct DiscordApi {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

/// A command as echoed back by the registration endpoint.
#[derive(Debug, Deserialize)]
pub struct RegisteredCommand {
    pub id: String,
    pub name: String,
}

/// Errors from the Discord REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum DiscordApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Discord returned a non-2xx status code.
    #[error("Discord API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl DiscordApi {
    /// Create a client against the public Discord API.
    pub fn new(token: String) -> Self {
        Self::with_base_url(token, DEFAULT_API_BASE.to_string())
    }

    /// Create a client against a different base URL (tests, proxies).
    pub fn with_base_url(token: String, api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Replace the guild's command set with `commands`.
    ///
    /// Sends `PUT /applications/{application_id}/guilds/{guild_id}/commands`.
    /// Discord treats this as a bulk overwrite, so it is safe to repeat on
    /// every startup.
    pub async fn register_guild_commands(
        &self,
        application_id: &str,
        guild_id: &str,
        commands: &[CommandDefinition],
    ) -> Result<Vec<RegisteredCommand>, DiscordApiError> {
        let response = self
            .client
            .put(format!(
                "{}/applications/{application_id}/guilds/{guild_id}/commands",
                self.api_url
            ))
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
            .json(commands)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Answer an interaction.
    ///
    /// Sends `POST /interactions/{id}/{token}/callback`. The interaction
    /// token authorizes the call, so no bot token is attached.
    pub async fn create_interaction_response(
        &self,
        interaction_id: &str,
        interaction_token: &str,
        response: &InteractionResponse,
    ) -> Result<(), DiscordApiError> {
        let http_response = self
            .client
            .post(format!(
                "{}/interactions/{interaction_id}/{interaction_token}/callback",
                self.api_url
            ))
            .json(response)
            .send()
            .await?;

        Self::ensure_success(http_response).await?;
        Ok(())
    }

    // ---- private helpers ----

    /// Return the response unchanged on success, or a
    /// [`DiscordApiError::Api`] carrying status and body on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, DiscordApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(DiscordApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, DiscordApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
