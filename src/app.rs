// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, route handlers, and router construction.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::models::version::VersionResponse;
use crate::services::handler::{SearchHandler, SearchOutcome};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `LOOKUP_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("LOOKUP_VERSION");

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Shared application state injected into every route handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub search_handler: Arc<SearchHandler>,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

pub async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        agent: "lala-lookup".to_string(),
        version: VERSION.to_string(),
    })
}

/// Run one search event. The body is any JSON value; the response body is
/// always the plain-text outcome.
pub async fn invoke_handler(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> (StatusCode, String) {
    let outcome = state.search_handler.execute(&payload).await;
    (outcome_status(&outcome), outcome.to_string())
}

fn outcome_status(outcome: &SearchOutcome) -> StatusCode {
    match outcome {
        SearchOutcome::Matched(_) | SearchOutcome::NoResults { .. } => StatusCode::OK,
        SearchOutcome::ClientUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        SearchOutcome::Failed(_) => StatusCode::BAD_GATEWAY,
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/version", get(version_handler))
        .route("/invoke", post(invoke_handler))
        .with_state(state)
}
