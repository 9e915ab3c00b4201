//! Hunt-wide statistics aggregation over historical sessions.

use uuid::Uuid;

use crate::{
    dao::models::SessionStatus,
    dto::game::StatsResponse,
    error::ServiceError,
    state::SharedState,
};

/// Compute completion metrics for a hunt. Never fails on empty data; a hunt
/// without sessions yields an all-zero response.
pub async fn hunt_stats(
    state: &SharedState,
    hunt_id: Uuid,
) -> Result<StatsResponse, ServiceError> {
    let store = state.require_hunt_store().await?;

    let total_sessions = store.count_sessions(hunt_id, None).await?;
    let completed_sessions = store
        .count_sessions(hunt_id, Some(SessionStatus::Completed))
        .await?;
    let completion_times = store.completed_session_times(hunt_id).await?;

    Ok(aggregate(
        total_sessions,
        completed_sessions,
        &completion_times,
    ))
}

/// Pure aggregation over already-fetched counts and durations.
fn aggregate(total_sessions: u64, completed_sessions: u64, times: &[u64]) -> StatsResponse {
    let average_completion_time = if times.is_empty() {
        0
    } else {
        let sum: u64 = times.iter().sum();
        ((sum as f64) / (times.len() as f64)).round() as u64
    };

    let completion_rate = if total_sessions == 0 {
        0.0
    } else {
        let rate = (completed_sessions as f64) / (total_sessions as f64) * 100.0;
        (rate * 100.0).round() / 100.0
    };

    StatsResponse {
        total_sessions,
        completed_sessions,
        average_completion_time,
        completion_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_data_is_all_zero() {
        let stats = aggregate(0, 0, &[]);
        assert_eq!(
            stats,
            StatsResponse {
                total_sessions: 0,
                completed_sessions: 0,
                average_completion_time: 0,
                completion_rate: 0.0,
            }
        );
    }

    #[test]
    fn average_is_rounded_mean_of_completed_times() {
        let stats = aggregate(10, 6, &[100, 110, 120, 130, 140, 150]);
        assert_eq!(stats.average_completion_time, 125);
        assert_eq!(stats.completion_rate, 60.00);
    }

    #[test]
    fn rate_is_rounded_to_two_decimals() {
        let stats = aggregate(3, 1, &[90]);
        assert_eq!(stats.completion_rate, 33.33);
        assert_eq!(stats.average_completion_time, 90);
    }

    #[test]
    fn average_rounds_to_nearest_second() {
        let stats = aggregate(2, 2, &[10, 11]);
        // 10.5 rounds up
        assert_eq!(stats.average_completion_time, 11);
    }

    #[test]
    fn incomplete_sessions_do_not_skew_the_average() {
        let stats = aggregate(5, 2, &[60, 120]);
        assert_eq!(stats.average_completion_time, 90);
        assert_eq!(stats.completion_rate, 40.0);
    }
}
