use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::hunt::{CreateHuntRequest, HuntListItem, HuntSummary},
    error::AppError,
    services::catalog_service,
    state::SharedState,
};

/// Routes handling hunt registration and lookup.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/hunts", post(create_hunt).get(list_hunts))
        .route("/api/hunts/{hunt_id}", get(get_hunt))
}

/// Register a hunt together with its ordered treasures and clues.
#[utoipa::path(
    post,
    path = "/api/hunts",
    tag = "hunts",
    request_body = CreateHuntRequest,
    responses(
        (status = 200, description = "Hunt registered", body = HuntSummary),
        (status = 400, description = "Invalid title, clue, or duplicate token")
    )
)]
pub async fn create_hunt(
    State(state): State<SharedState>,
    Json(payload): Json<CreateHuntRequest>,
) -> Result<Json<HuntSummary>, AppError> {
    payload.validate()?;
    let summary = catalog_service::create_hunt(&state, payload).await?;
    Ok(Json(summary))
}

/// List registered hunts.
#[utoipa::path(
    get,
    path = "/api/hunts",
    tag = "hunts",
    responses(
        (status = 200, description = "Registered hunts", body = [HuntListItem])
    )
)]
pub async fn list_hunts(
    State(state): State<SharedState>,
) -> Result<Json<Vec<HuntListItem>>, AppError> {
    let hunts = catalog_service::list_hunts(&state).await?;
    Ok(Json(hunts))
}

/// Fetch a hunt with its treasures.
#[utoipa::path(
    get,
    path = "/api/hunts/{hunt_id}",
    tag = "hunts",
    params(("hunt_id" = Uuid, Path, description = "Hunt identifier")),
    responses(
        (status = 200, description = "Hunt details", body = HuntSummary),
        (status = 404, description = "Hunt not found")
    )
)]
pub async fn get_hunt(
    State(state): State<SharedState>,
    Path(hunt_id): Path<Uuid>,
) -> Result<Json<HuntSummary>, AppError> {
    let summary = catalog_service::get_hunt(&state, hunt_id).await?;
    Ok(Json(summary))
}
