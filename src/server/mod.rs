//! HTTP server for the task-execution façade.
//!
//! # Endpoints
//!
//! - `GET  /health`  — liveness probe
//! - `POST /execute` — run one task through a single-agent sequential crew

pub mod routes;

pub use routes::{app_router, AppState};
