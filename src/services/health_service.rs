use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Probe the installed store and report ok/degraded. A failed probe is only
/// logged here; flipping the degraded flag is the supervisor's job.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.hunt_store().await {
        Some(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "storage health check failed");
            }
        }
        None => warn!("storage unavailable (degraded mode)"),
    }

    HealthResponse::from_degraded(state.is_degraded().await)
}
