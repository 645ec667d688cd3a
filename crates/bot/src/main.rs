use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use renderq_bot::config::BotConfig;
use renderq_bot::lifecycle::JobLifecycle;
use renderq_bot::router::{serve_interactions, CommandRouter, InteractionResponder};
use renderq_bot::state::AppState;
use renderq_bot::{commands, routes};
use renderq_discord::api::DiscordApi;
use renderq_discord::client::GatewayClient;
use renderq_discord::messages::INTENT_GUILDS;
use renderq_discord::session::{run_session, SessionConfig};

/// Buffered interactions between the gateway reader and the handlers.
const INTERACTION_BUFFER: usize = 64;

/// How long to wait for background tasks once shutdown starts.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "renderq_bot=debug,renderq_discord=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // --- Configuration ---
    let config = BotConfig::from_env().expect("Invalid bot configuration");
    tracing::info!(host = %config.host, port = config.port, guild_id = %config.guild_id, "Loaded bot configuration");

    // --- Database ---
    let command_timeout = Duration::from_secs(config.command_timeout_secs);
    let pool = renderq_db::create_pool_with_timeout(&config.database_url, command_timeout)
        .await
        .expect("Failed to open render job store");
    tracing::info!(database_url = %config.database_url, "Database connection pool created");

    renderq_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    renderq_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Command registration ---
    let api = DiscordApi::new(config.discord_token.clone());
    match api
        .register_guild_commands(&config.application_id, &config.guild_id, &commands::definitions())
        .await
    {
        Ok(registered) => {
            tracing::info!(count = registered.len(), "Slash commands registered");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to register slash commands");
        }
    }

    let cancel = CancellationToken::new();

    // --- Keep-alive server ---
    let state = AppState { pool: pool.clone() };
    let app = routes::build_app(state);

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind keep-alive address");
    tracing::info!(%addr, "Keep-alive server listening");

    let server_cancel = cancel.clone();
    let server_handle = tokio::spawn(async move {
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move { server_cancel.cancelled().await })
            .await;
        if let Err(e) = result {
            tracing::error!(error = %e, "Keep-alive server error");
        }
    });

    // --- Interaction handlers ---
    let (interactions_tx, interactions_rx) = mpsc::channel(INTERACTION_BUFFER);
    let router = CommandRouter::new(
        JobLifecycle::new(pool.clone()),
        command_timeout,
    );
    let responder: Arc<dyn InteractionResponder> = Arc::new(api);
    let handler_handle = tokio::spawn(serve_interactions(
        interactions_rx,
        router,
        responder,
        cancel.clone(),
    ));

    // --- Signals ---
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_cancel.cancel();
    });

    // --- Gateway ---
    let session_config = SessionConfig {
        token: config.discord_token.clone(),
        intents: INTENT_GUILDS,
    };
    match GatewayClient::default().connect().await {
        Ok(mut conn) => {
            match run_session(&mut conn.ws_stream, &session_config, &interactions_tx, &cancel).await {
                Ok(end) => tracing::info!(?end, "Gateway session ended"),
                Err(e) => tracing::error!(error = %e, "Gateway session failed"),
            }
        }
        Err(e) => tracing::error!(error = %e, "Failed to connect to Discord gateway"),
    }

    // --- Shutdown ---
    tracing::info!("Shutting down");
    cancel.cancel();
    drop(interactions_tx);

    let _ = tokio::time::timeout(SHUTDOWN_GRACE, handler_handle).await;
    tracing::info!("Interaction handlers drained");
    let _ = tokio::time::timeout(SHUTDOWN_GRACE, server_handle).await;
    tracing::info!("Keep-alive server stopped");

    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
