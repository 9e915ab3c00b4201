//! Session lifecycle rules: the `Active → Completed | Abandoned` state
//! machine and the pure progress projections derived from session data.

use std::time::SystemTime;

use thiserror::Error;

use crate::dao::models::{GameSessionEntity, SessionStatus};

/// Error returned when a gameplay mutation is attempted on a session that is
/// no longer active.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("session is {status:?}; gameplay mutations require an active session")]
pub struct InactiveSession {
    /// Status the session was in when the mutation was rejected.
    pub status: SessionStatus,
}

/// Advance the cursor to the next treasure after a non-final discovery.
///
/// The ordinal moves forward by exactly one and never past
/// `total_treasures + 1`; completed and abandoned sessions are immutable.
pub fn advance(session: &mut GameSessionEntity) -> Result<(), InactiveSession> {
    ensure_active(session)?;
    debug_assert!(session.current_ordinal <= session.total_treasures);
    session.current_ordinal += 1;
    Ok(())
}

/// Terminal transition applied when the last treasure is found.
pub fn complete(session: &mut GameSessionEntity, now: SystemTime) -> Result<(), InactiveSession> {
    ensure_active(session)?;
    session.status = SessionStatus::Completed;
    session.completed_at = Some(now);
    session.total_time_seconds = elapsed_whole_seconds(session.started_at, now);
    Ok(())
}

/// Terminal transition applied when the player quits.
pub fn abandon(session: &mut GameSessionEntity) -> Result<(), InactiveSession> {
    ensure_active(session)?;
    session.status = SessionStatus::Abandoned;
    Ok(())
}

fn ensure_active(session: &GameSessionEntity) -> Result<(), InactiveSession> {
    if !session.status.is_active() {
        return Err(InactiveSession {
            status: session.status,
        });
    }
    Ok(())
}

/// Fraction of the hunt finished, in `0.0..=1.0`. Computed on read, never
/// stored.
pub fn progress(session: &GameSessionEntity) -> f64 {
    if session.total_treasures == 0 {
        return 0.0;
    }
    let found = session.current_ordinal.saturating_sub(1);
    f64::from(found.min(session.total_treasures)) / f64::from(session.total_treasures)
}

/// [`progress`] as a rounded whole percentage.
pub fn progress_percentage(session: &GameSessionEntity) -> u8 {
    (progress(session) * 100.0).round() as u8
}

/// Whole seconds between two instants, floored and clamped at zero so clock
/// skew never yields a negative duration.
pub fn elapsed_whole_seconds(earlier: SystemTime, now: SystemTime) -> u64 {
    now.duration_since(earlier).unwrap_or_default().as_secs()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use uuid::Uuid;

    use super::*;

    fn session(status: SessionStatus, current_ordinal: u32, total: u32) -> GameSessionEntity {
        GameSessionEntity {
            id: Uuid::new_v4(),
            hunt_id: Uuid::new_v4(),
            player_name: "Ada".into(),
            status,
            current_ordinal,
            total_treasures: total,
            started_at: SystemTime::UNIX_EPOCH,
            completed_at: None,
            total_time_seconds: 0,
        }
    }

    #[test]
    fn advance_increments_by_exactly_one() {
        let mut s = session(SessionStatus::Active, 1, 3);
        advance(&mut s).unwrap();
        assert_eq!(s.current_ordinal, 2);
        advance(&mut s).unwrap();
        assert_eq!(s.current_ordinal, 3);
        assert_eq!(s.status, SessionStatus::Active);
    }

    #[test]
    fn complete_sets_terminal_fields() {
        let mut s = session(SessionStatus::Active, 3, 3);
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(125);
        complete(&mut s, now).unwrap();
        assert_eq!(s.status, SessionStatus::Completed);
        assert_eq!(s.completed_at, Some(now));
        assert_eq!(s.total_time_seconds, 125);
    }

    #[test]
    fn terminal_sessions_reject_all_transitions() {
        for status in [SessionStatus::Completed, SessionStatus::Abandoned] {
            let mut s = session(status, 2, 3);
            assert_eq!(advance(&mut s).unwrap_err().status, status);
            assert_eq!(
                complete(&mut s, SystemTime::UNIX_EPOCH).unwrap_err().status,
                status
            );
            assert_eq!(abandon(&mut s).unwrap_err().status, status);
            assert_eq!(s.current_ordinal, 2);
        }
    }

    #[test]
    fn abandon_only_changes_status() {
        let mut s = session(SessionStatus::Active, 2, 5);
        abandon(&mut s).unwrap();
        assert_eq!(s.status, SessionStatus::Abandoned);
        assert_eq!(s.current_ordinal, 2);
        assert_eq!(s.completed_at, None);
    }

    #[test]
    fn progress_is_derived_from_cursor() {
        let s = session(SessionStatus::Active, 1, 4);
        assert_eq!(progress(&s), 0.0);
        let s = session(SessionStatus::Active, 3, 4);
        assert_eq!(progress(&s), 0.5);
        assert_eq!(progress_percentage(&s), 50);
        let s = session(SessionStatus::Completed, 5, 4);
        assert_eq!(progress(&s), 1.0);
    }

    #[test]
    fn progress_handles_zero_treasures() {
        let s = session(SessionStatus::Active, 1, 0);
        assert_eq!(progress(&s), 0.0);
    }

    #[test]
    fn elapsed_clamps_clock_skew_to_zero() {
        let earlier = SystemTime::UNIX_EPOCH + Duration::from_secs(100);
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(40);
        assert_eq!(elapsed_whole_seconds(earlier, now), 0);
    }

    #[test]
    fn elapsed_floors_to_whole_seconds() {
        let earlier = SystemTime::UNIX_EPOCH;
        let now = earlier + Duration::from_millis(1999);
        assert_eq!(elapsed_whole_seconds(earlier, now), 1);
    }
}
