use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tracing::error;

use quotebot_types::api::{CommandRequest, CommandResponse};

use crate::commands::{self, Cmd};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/commands", post(handle_command))
        .route("/health", get(health))
        .with_state(state)
}

/// POST /commands — one chat line in, at most one reply out.
pub async fn handle_command(
    State(state): State<AppState>,
    Json(req): Json<CommandRequest>,
) -> Result<Json<CommandResponse>, StatusCode> {
    let Some(cmd) = Cmd::parse(&state.prefix, req) else {
        return Ok(Json(CommandResponse { reply: None }));
    };

    // SQLite work is blocking; keep it off the async runtime
    let reply = tokio::task::spawn_blocking(move || commands::dispatch(&state, &cmd))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(CommandResponse { reply }))
}

async fn health() -> &'static str {
    "ok"
}
