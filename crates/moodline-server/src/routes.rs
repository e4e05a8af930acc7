//! HTTP routes and handlers

use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use moodline_classifiers::InferenceDispatcher;
use moodline_core::Error;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

/// Shared application state: the dispatcher over the one-time resolution.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<InferenceDispatcher>,
}

impl AppState {
    pub fn new(dispatcher: InferenceDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/analyze", post(analyze))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

/// Classification request; `title` is the only required field.
#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    title: Option<String>,
}

async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    // Validate before touching any model: an unparseable body or a missing
    // field is a client error, not an inference failure.
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &format!("Invalid request body: {}", rejection),
            );
        }
    };

    let Some(title) = request.title else {
        return error_response(StatusCode::BAD_REQUEST, "Missing 'title' in request");
    };

    debug!(length = title.len(), "classifying title");

    let dispatcher = state.dispatcher.clone();
    let outcome = tokio::task::spawn_blocking(move || dispatcher.classify(&title)).await;

    match outcome {
        Ok(Ok(result)) => (StatusCode::OK, Json(result)).into_response(),
        Ok(Err(err)) => {
            error!("classification failed: {}", err);
            let status = match err {
                Error::Validation(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            error_response(status, &err.to_string())
        }
        Err(err) => {
            error!("inference task failed: {}", err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "inference task failed")
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
