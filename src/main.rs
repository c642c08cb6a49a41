//! promptwiz server binary
//!
//! Serves the prompt generation relay and the static catalogs.
//! Access via: http://localhost:8888/api/

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use tokio::signal;

use promptwiz::config::{ServerConfig, CREDENTIAL_ENV_VARS};
use promptwiz::failover::CredentialPool;
use promptwiz::providers::GeminiClient;
use promptwiz::server::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()>
{   dotenvy::dotenv().ok();
    env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or("info")
    ).init();

    let config = ServerConfig::parse();

    let pool = CredentialPool::from_env(&CREDENTIAL_ENV_VARS);
    if pool.is_empty()
    {   warn!(
          "No API credentials configured ({}); generate requests will fail",
          CREDENTIAL_ENV_VARS.join(", ")
        );
    } else
    {   info!("Loaded {} API credentials", pool.len());
    }

    let gemini = config.gemini();
    gemini.validate()?;
    info!(
      "Using model {} (attempt timeout {}s)",
      gemini.model, gemini.attempt_timeout_secs
    );

    let state = AppState::new(
      Arc::new(GeminiClient::new(gemini)),
      Arc::new(pool),
    );
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
      .with_graceful_shutdown(shutdown_signal())
      .await?;

    info!("Server stopped");
    Ok(())
}

#[allow(clippy::expect_used)]
async fn shutdown_signal()
{   let ctrl_c = async {
      signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
      signal::unix::signal(signal::unix::SignalKind::terminate())
        .expect("failed to install SIGTERM handler")
        .recv()
        .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select!
    { () = ctrl_c => info!("Received Ctrl+C, shutting down")
    , () = terminate => info!("Received SIGTERM, shutting down")
    }
}
