mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};

use evergreens_api::{AppState, AppStateInner, routes};
use evergreens_chat::{ChatGateway, GeminiClient};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evergreens=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = evergreens_db::Database::open(&config.db_path)?;

    // Chat gateway
    let client = GeminiClient::new(
        config.chat.api_key.clone(),
        config.chat.model.clone(),
        config.chat.api_base.clone(),
        config.chat.timeout,
    )?;
    if !client.has_api_key() {
        warn!("GEMINI_API_KEY is unset; chat will answer with the fallback reply");
    }
    let chat = ChatGateway::new(Arc::new(client), config.chat.prompt);
    info!(
        "Chat model {} with prompt revision {}",
        config.chat.model,
        chat.revision()
    );

    let state: AppState = Arc::new(AppStateInner { db, chat });
    let app = routes::router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Evergreens portal listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
