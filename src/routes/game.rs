use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::game::{ScanRequest, ScanResponse, SessionView, StartGameRequest, StatsResponse},
    error::AppError,
    services::{game_service, stats_service},
    state::SharedState,
};

/// Routes handling the session lifecycle and scans.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/game/hunts/{hunt_id}/start", post(start_game))
        .route("/api/game/hunts/{hunt_id}/stats", get(hunt_stats))
        .route(
            "/api/game/sessions/{session_id}",
            get(get_session).delete(delete_session),
        )
        .route("/api/game/sessions/{session_id}/scan", post(scan_code))
        .route("/api/game/sessions/{session_id}/abandon", post(abandon_game))
}

/// Start a new game session on a hunt.
#[utoipa::path(
    post,
    path = "/api/game/hunts/{hunt_id}/start",
    tag = "game",
    params(("hunt_id" = Uuid, Path, description = "Hunt to play")),
    request_body = StartGameRequest,
    responses(
        (status = 200, description = "Session started", body = SessionView),
        (status = 400, description = "Hunt has no treasures or player name invalid"),
        (status = 404, description = "Hunt not found")
    )
)]
pub async fn start_game(
    State(state): State<SharedState>,
    Path(hunt_id): Path<Uuid>,
    Json(payload): Json<StartGameRequest>,
) -> Result<Json<SessionView>, AppError> {
    payload.validate()?;
    let view = game_service::start_game(&state, hunt_id, payload).await?;
    Ok(Json(view))
}

/// Fetch a session with its discoveries, treasures, and clues.
#[utoipa::path(
    get,
    path = "/api/game/sessions/{session_id}",
    tag = "game",
    params(("session_id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Session details", body = SessionView),
        (status = 404, description = "Session not found")
    )
)]
pub async fn get_session(
    State(state): State<SharedState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = game_service::get_session(&state, session_id).await?;
    Ok(Json(view))
}

/// Submit a scanned QR payload for validation against the session.
#[utoipa::path(
    post,
    path = "/api/game/sessions/{session_id}/scan",
    tag = "game",
    params(("session_id" = Uuid, Path, description = "Session identifier")),
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Scan outcome (success or rejection)", body = ScanResponse),
        (status = 400, description = "Session is not active"),
        (status = 404, description = "Session not found")
    )
)]
pub async fn scan_code(
    State(state): State<SharedState>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<ScanRequest>,
) -> Result<Json<ScanResponse>, AppError> {
    payload.validate()?;
    let outcome = game_service::scan_code(&state, session_id, payload).await?;
    Ok(Json(outcome))
}

/// Abandon an active session.
#[utoipa::path(
    post,
    path = "/api/game/sessions/{session_id}/abandon",
    tag = "game",
    params(("session_id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 204, description = "Session abandoned"),
        (status = 400, description = "Session is not active"),
        (status = 404, description = "Session not found")
    )
)]
pub async fn abandon_game(
    State(state): State<SharedState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    game_service::abandon_game(&state, session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a session and its discoveries.
#[utoipa::path(
    delete,
    path = "/api/game/sessions/{session_id}",
    tag = "game",
    params(("session_id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Session not found")
    )
)]
pub async fn delete_session(
    State(state): State<SharedState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    game_service::delete_session(&state, session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Aggregate completion metrics for a hunt.
#[utoipa::path(
    get,
    path = "/api/game/hunts/{hunt_id}/stats",
    tag = "game",
    params(("hunt_id" = Uuid, Path, description = "Hunt identifier")),
    responses(
        (status = 200, description = "Hunt statistics", body = StatsResponse)
    )
)]
pub async fn hunt_stats(
    State(state): State<SharedState>,
    Path(hunt_id): Path<Uuid>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = stats_service::hunt_stats(&state, hunt_id).await?;
    Ok(Json(stats))
}
