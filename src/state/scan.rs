//! Pure scan classification: decides what a scanned token means for a
//! session without touching storage. The caller checks the active-session
//! precondition and executes the resulting mutation.

use std::time::SystemTime;

use tracing::warn;

use crate::dao::models::{DiscoveryEntity, GameSessionEntity, TreasureEntity};
use crate::state::session::elapsed_whole_seconds;

/// Why a scan was rejected. Rejections are normal gameplay outcomes, not
/// errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanRejection {
    /// No treasure in this session's hunt carries the scanned token.
    InvalidCode,
    /// The treasure was already found earlier in the sequence.
    AlreadyFound,
    /// The treasure lies ahead of the player's cursor.
    OutOfSequence {
        /// Ordinal of the treasure the player must find next.
        expected_ordinal: u32,
    },
}

/// Outcome of classifying one scan against session and catalog state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanDecision {
    /// The scan does not advance the hunt; carries the reason.
    Rejected(ScanRejection),
    /// The scanned treasure is the one expected next.
    Match {
        /// The matched treasure.
        treasure: TreasureEntity,
        /// Whole seconds since the previous discovery (or session start).
        elapsed_seconds: u64,
        /// Whether this discovery finishes the hunt.
        completes_hunt: bool,
    },
}

/// Classify a scanned token. `treasure` is the hunt-scoped token lookup
/// result; `discoveries` are the session's prior discoveries.
///
/// The session must be active; that precondition belongs to the caller.
pub fn classify(
    session: &GameSessionEntity,
    treasure: Option<&TreasureEntity>,
    discoveries: &[DiscoveryEntity],
    now: SystemTime,
) -> ScanDecision {
    let Some(treasure) = treasure else {
        return ScanDecision::Rejected(ScanRejection::InvalidCode);
    };

    if treasure.ordinal < session.current_ordinal {
        return ScanDecision::Rejected(ScanRejection::AlreadyFound);
    }

    if treasure.ordinal > session.current_ordinal {
        return ScanDecision::Rejected(ScanRejection::OutOfSequence {
            expected_ordinal: session.current_ordinal,
        });
    }

    // Monotonic ordering makes a discovery at the cursor impossible, so a
    // stored one means the session and its discoveries disagree. Report it
    // as "already found" rather than crashing or double-recording.
    if discoveries
        .iter()
        .any(|discovery| discovery.treasure_id == treasure.id)
    {
        warn!(
            session_id = %session.id,
            treasure_id = %treasure.id,
            ordinal = treasure.ordinal,
            "discovery already recorded at the session cursor; session state is inconsistent"
        );
        return ScanDecision::Rejected(ScanRejection::AlreadyFound);
    }

    let elapsed_seconds = match discoveries.iter().max_by_key(|d| d.discovered_at) {
        Some(last) => elapsed_whole_seconds(last.discovered_at, now),
        None => elapsed_whole_seconds(session.started_at, now),
    };

    ScanDecision::Match {
        treasure: treasure.clone(),
        elapsed_seconds,
        completes_hunt: treasure.ordinal == session.total_treasures,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use uuid::Uuid;

    use super::*;
    use crate::dao::models::SessionStatus;

    fn treasure(ordinal: u32) -> TreasureEntity {
        TreasureEntity {
            id: Uuid::new_v4(),
            ordinal,
            scan_token: format!("token-{ordinal}"),
            clue_text: format!("clue {ordinal}"),
        }
    }

    fn session(current_ordinal: u32, total: u32) -> GameSessionEntity {
        GameSessionEntity {
            id: Uuid::new_v4(),
            hunt_id: Uuid::new_v4(),
            player_name: "Ada".into(),
            status: SessionStatus::Active,
            current_ordinal,
            total_treasures: total,
            started_at: SystemTime::UNIX_EPOCH,
            completed_at: None,
            total_time_seconds: 0,
        }
    }

    fn discovery(treasure: &TreasureEntity, session: &GameSessionEntity, at_secs: u64) -> DiscoveryEntity {
        DiscoveryEntity {
            id: Uuid::new_v4(),
            game_session_id: session.id,
            treasure_id: treasure.id,
            treasure_ordinal: treasure.ordinal,
            discovered_at: SystemTime::UNIX_EPOCH + Duration::from_secs(at_secs),
            time_taken_seconds: at_secs,
        }
    }

    #[test]
    fn unknown_token_is_invalid_code() {
        let s = session(1, 3);
        let decision = classify(&s, None, &[], SystemTime::UNIX_EPOCH);
        assert_eq!(decision, ScanDecision::Rejected(ScanRejection::InvalidCode));
    }

    #[test]
    fn ordinal_behind_cursor_is_already_found() {
        let s = session(3, 5);
        for ordinal in 1..3 {
            let t = treasure(ordinal);
            let decision = classify(&s, Some(&t), &[], SystemTime::UNIX_EPOCH);
            assert_eq!(
                decision,
                ScanDecision::Rejected(ScanRejection::AlreadyFound)
            );
        }
    }

    #[test]
    fn ordinal_ahead_of_cursor_is_out_of_sequence() {
        let s = session(2, 5);
        for ordinal in 3..=5 {
            let t = treasure(ordinal);
            let decision = classify(&s, Some(&t), &[], SystemTime::UNIX_EPOCH);
            assert_eq!(
                decision,
                ScanDecision::Rejected(ScanRejection::OutOfSequence {
                    expected_ordinal: 2
                })
            );
        }
    }

    #[test]
    fn first_match_measures_from_session_start() {
        let s = session(1, 3);
        let t = treasure(1);
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(42);
        match classify(&s, Some(&t), &[], now) {
            ScanDecision::Match {
                elapsed_seconds,
                completes_hunt,
                ..
            } => {
                assert_eq!(elapsed_seconds, 42);
                assert!(!completes_hunt);
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn later_match_measures_from_most_recent_discovery() {
        let mut s = session(3, 3);
        s.started_at = SystemTime::UNIX_EPOCH;
        let first = treasure(1);
        let second = treasure(2);
        let third = treasure(3);
        let discoveries = vec![
            discovery(&first, &s, 10),
            discovery(&second, &s, 30),
        ];

        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(75);
        match classify(&s, Some(&third), &discoveries, now) {
            ScanDecision::Match {
                elapsed_seconds,
                completes_hunt,
                ..
            } => {
                assert_eq!(elapsed_seconds, 45);
                assert!(completes_hunt);
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn stored_discovery_at_cursor_rejects_as_already_found() {
        let s = session(2, 3);
        let t = treasure(2);
        let stray = discovery(&t, &s, 5);
        let decision = classify(&s, Some(&t), &[stray], SystemTime::UNIX_EPOCH);
        assert_eq!(
            decision,
            ScanDecision::Rejected(ScanRejection::AlreadyFound)
        );
    }

    #[test]
    fn final_ordinal_match_completes_hunt() {
        let s = session(4, 4);
        let t = treasure(4);
        match classify(&s, Some(&t), &[], SystemTime::UNIX_EPOCH) {
            ScanDecision::Match { completes_hunt, .. } => assert!(completes_hunt),
            other => panic!("expected match, got {other:?}"),
        }
    }
}
