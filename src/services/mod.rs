/// Thin hunt/treasure registration surface.
pub mod catalog_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Session lifecycle and scan handling.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Hunt statistics aggregation.
pub mod stats_service;
/// Storage connection supervision.
pub mod storage_supervisor;
