//! Axum route handlers for the crew-wrapper HTTP service.
//!
//! # Routes
//!
//! - `GET  /health`  — Returns `{"status": "ok", "version": ..., "service": ...}`
//! - `POST /execute` — Accepts a [`TaskRequest`], runs it through the
//!   execution façade, returns `{"result": "<string>"}` or a 500 with an
//!   error envelope carrying the message and rendered error chain.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::execution::{CrewRunner, TaskRequest, TaskRunner};

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Execution façade the handlers delegate to.
    pub runner: Arc<dyn TaskRunner>,
}

impl AppState {
    /// State backed by the real crew runner.
    pub fn new() -> Self {
        Self {
            runner: Arc::new(CrewRunner::new()),
        }
    }

    /// State with an explicit runner. Tests use this to substitute mocks.
    pub fn with_runner(runner: Arc<dyn TaskRunner>) -> Self {
        Self { runner }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/execute", post(execute_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Success body: `{"result": "<string>"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteResponse {
    /// The façade's output, passed through unchanged.
    pub result: String,
}

/// Diagnostic detail carried by an error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// The error's string form.
    pub detail: String,
    /// Rendered error chain; `None` only for request-validation errors.
    pub traceback: Option<String>,
}

/// Error body: `{"detail": {"detail": ..., "traceback": ...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub detail: ErrorDetail,
}

/// GET /health — liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "crew-wrapper",
    }))
}

fn validation_error(field: &str) -> (StatusCode, Json<ErrorEnvelope>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorEnvelope {
            detail: ErrorDetail {
                detail: format!("field '{}' must be a non-empty string", field),
                traceback: None,
            },
        }),
    )
}

/// POST /execute — run one task request through the execution façade.
///
/// Required fields must be non-empty; violations are rejected with a client
/// error before any delegation. Façade failures are logged with their full
/// error chain and surfaced verbatim in the 500 body. No retry, no partial
/// result, no fallback.
async fn execute_handler(
    State(state): State<AppState>,
    Json(request): Json<TaskRequest>,
) -> Result<Json<ExecuteResponse>, (StatusCode, Json<ErrorEnvelope>)> {
    for (field, value) in [
        ("model_name", &request.model_name),
        ("role", &request.role),
        ("goal", &request.goal),
        ("task", &request.task),
    ] {
        if value.trim().is_empty() {
            return Err(validation_error(field));
        }
    }

    match state.runner.run(&request).await {
        Ok(result) => Ok(Json(ExecuteResponse { result })),
        Err(error) => {
            let traceback = error.trace();
            tracing::error!("Error executing task: {}\n{}", error, traceback);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorEnvelope {
                    detail: ErrorDetail {
                        detail: error.to_string(),
                        traceback: Some(traceback),
                    },
                }),
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExecutionError;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Runner that records every request and answers from a script.
    #[derive(Default)]
    struct RecordingRunner {
        calls: Mutex<Vec<TaskRequest>>,
        fail_with: Option<String>,
    }

    impl RecordingRunner {
        fn failing(message: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_with: Some(message.to_string()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl TaskRunner for RecordingRunner {
        async fn run(&self, request: &TaskRequest) -> Result<String, ExecutionError> {
            self.calls.lock().unwrap().push(request.clone());
            match &self.fail_with {
                Some(message) => Err(ExecutionError::Runtime(message.clone())),
                None => Ok("stubbed result".to_string()),
            }
        }
    }

    fn post_execute(body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/execute")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = app_router(AppState::new());

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], crate::VERSION);
        assert_eq!(json["service"], "crew-wrapper");
    }

    #[tokio::test]
    async fn execute_wraps_result_and_defaults_backstory() {
        let runner = Arc::new(RecordingRunner::default());
        let app = app_router(AppState::with_runner(runner.clone()));

        let response = app
            .oneshot(post_execute(&serde_json::json!({
                "model_name": "llama2",
                "role": "writer",
                "goal": "summarize",
                "task": "Summarize: The sky is blue.",
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["result"], "stubbed result");

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model_name, "llama2");
        assert_eq!(calls[0].role, "writer");
        assert_eq!(calls[0].goal, "summarize");
        assert_eq!(calls[0].task, "Summarize: The sky is blue.");
        assert_eq!(calls[0].backstory, "");
    }

    #[tokio::test]
    async fn facade_error_becomes_500_with_traceback() {
        let runner = Arc::new(RecordingRunner::failing("model runtime unreachable"));
        let app = app_router(AppState::with_runner(runner.clone()));

        let response = app
            .oneshot(post_execute(&serde_json::json!({
                "model_name": "llama2",
                "role": "writer",
                "goal": "summarize",
                "task": "anything",
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        let expected = ExecutionError::Runtime("model runtime unreachable".to_string());
        assert_eq!(json["detail"]["detail"], expected.to_string());

        let traceback = json["detail"]["traceback"].as_str().unwrap();
        assert!(!traceback.is_empty());
        assert!(traceback.contains("model runtime unreachable"));
    }

    #[tokio::test]
    async fn missing_required_field_never_reaches_the_facade() {
        let runner = Arc::new(RecordingRunner::default());
        let app = app_router(AppState::with_runner(runner.clone()));

        // No "task" field: rejected by payload deserialization.
        let response = app
            .oneshot(post_execute(&serde_json::json!({
                "model_name": "llama2",
                "role": "writer",
                "goal": "summarize",
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_required_field_is_a_client_error() {
        let runner = Arc::new(RecordingRunner::default());
        let app = app_router(AppState::with_runner(runner.clone()));

        let response = app
            .oneshot(post_execute(&serde_json::json!({
                "model_name": "",
                "role": "writer",
                "goal": "summarize",
                "task": "anything",
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = body_json(response).await;
        assert!(json["detail"]["detail"]
            .as_str()
            .unwrap()
            .contains("model_name"));
        assert!(json["detail"]["traceback"].is_null());
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn malformed_json_is_a_client_error() {
        let runner = Arc::new(RecordingRunner::default());
        let app = app_router(AppState::with_runner(runner.clone()));

        let request = Request::builder()
            .method("POST")
            .uri("/execute")
            .header("Content-Type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(runner.call_count(), 0);
    }
}
