//! crew-wrapper HTTP server binary.
//!
//! Starts an axum HTTP server on the loopback interface exposing the
//! task-execution façade.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server            # listens on 127.0.0.1:3001
//! cargo run --bin server -- 8080    # custom port
//! ```
//!
//! # Environment Variables
//!
//! - `OLLAMA_URL` — Base URL of the Ollama runtime (default: `http://127.0.0.1:11434`)
//! - `RUST_LOG`   — Tracing filter (default: "info,crew_wrapper=debug")

use anyhow::Context;
use crew_wrapper::server::{app_router, AppState};

/// Port used when no argument is given.
const DEFAULT_PORT: u16 = 3001;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,crew_wrapper=debug".into()),
        )
        .init();

    let port: u16 = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("invalid port argument: {arg}"))?,
        None => DEFAULT_PORT,
    };
    let bind_addr = format!("127.0.0.1:{port}");

    let state = AppState::new();
    let app = app_router(state);

    tracing::info!("crew-wrapper server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health  — liveness probe");
    tracing::info!("  POST /execute — single-task crew execution");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
