use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the treasure hunt backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::game::start_game,
        crate::routes::game::get_session,
        crate::routes::game::scan_code,
        crate::routes::game::abandon_game,
        crate::routes::game::delete_session,
        crate::routes::game::hunt_stats,
        crate::routes::hunts::create_hunt,
        crate::routes::hunts::list_hunts,
        crate::routes::hunts::get_hunt,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::game::StartGameRequest,
            crate::dto::game::ScanRequest,
            crate::dto::game::ScanResponse,
            crate::dto::game::ScanReason,
            crate::dto::game::SessionView,
            crate::dto::game::DiscoveryView,
            crate::dto::game::TreasureView,
            crate::dto::game::StatsResponse,
            crate::dto::hunt::CreateHuntRequest,
            crate::dto::hunt::TreasureInput,
            crate::dto::hunt::HuntSummary,
            crate::dto::hunt::TreasureSummary,
            crate::dto::hunt::HuntListItem,
            crate::dao::models::SessionStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "game", description = "Session lifecycle and scanning"),
        (name = "hunts", description = "Hunt registration and lookup"),
    )
)]
pub struct ApiDoc;
