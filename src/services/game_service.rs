//! Session lifecycle operations: start, fetch, scan, abandon, delete.
//!
//! Scan classification itself lives in [`crate::state::scan`]; this module
//! owns the surrounding preconditions and the resulting storage mutations.

use std::time::SystemTime;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::models::{DiscoveryEntity, GameSessionEntity, SessionStatus},
    dao::storage::StorageError,
    dto::game::{ScanRequest, ScanResponse, SessionView, StartGameRequest},
    error::ServiceError,
    state::{
        SharedState,
        scan::{self, ScanDecision, ScanRejection},
        session,
    },
};

/// Start a new session for a player on the given hunt.
pub async fn start_game(
    state: &SharedState,
    hunt_id: Uuid,
    request: StartGameRequest,
) -> Result<SessionView, ServiceError> {
    let store = state.require_hunt_store().await?;

    let Some(hunt) = store.find_hunt(hunt_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "hunt `{hunt_id}` not found"
        )));
    };

    if hunt.treasures.is_empty() {
        return Err(ServiceError::InvalidInput(
            "hunt must have at least one treasure to start".into(),
        ));
    }

    let session = GameSessionEntity {
        id: Uuid::new_v4(),
        hunt_id,
        player_name: request.player_name,
        status: SessionStatus::Active,
        current_ordinal: 1,
        total_treasures: hunt.treasures.len() as u32,
        started_at: SystemTime::now(),
        completed_at: None,
        total_time_seconds: 0,
    };

    store.create_session(session.clone()).await?;
    info!(session_id = %session.id, %hunt_id, player = %session.player_name, "session started");

    Ok((session, Vec::new(), hunt).into())
}

/// Fetch a session with its discoveries and their treasures/clues.
pub async fn get_session(
    state: &SharedState,
    session_id: Uuid,
) -> Result<SessionView, ServiceError> {
    let store = state.require_hunt_store().await?;

    let Some(session) = store.find_session(session_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "game session `{session_id}` not found"
        )));
    };

    let Some(hunt) = store.find_hunt(session.hunt_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "hunt `{}` referenced by session `{session_id}` not found",
            session.hunt_id
        )));
    };

    let discoveries = store.session_discoveries(session_id).await?;
    Ok((session, discoveries, hunt).into())
}

/// Validate one scanned token against the session and apply the outcome.
///
/// Duplicate submissions of the correct code serialize through the session
/// gate: the first one advances the cursor, the re-read turns the second
/// into an `already_found` rejection.
pub async fn scan_code(
    state: &SharedState,
    session_id: Uuid,
    request: ScanRequest,
) -> Result<ScanResponse, ServiceError> {
    let store = state.require_hunt_store().await?;

    let gate = state.session_gate(session_id);
    let _guard = gate.lock().await;

    // Re-read inside the gate so the decision is based on current state.
    let Some(mut game_session) = store.find_session(session_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "game session `{session_id}` not found"
        )));
    };

    if !game_session.status.is_active() {
        return Err(ServiceError::InvalidState(
            "game session is not active".into(),
        ));
    }

    let treasure = store
        .find_treasure_by_token(game_session.hunt_id, request.scan_token)
        .await?;
    let discoveries = store.session_discoveries(session_id).await?;

    let now = SystemTime::now();
    let decision = scan::classify(&game_session, treasure.as_ref(), &discoveries, now);

    let (found, elapsed_seconds, completes_hunt) = match decision {
        ScanDecision::Rejected(ScanRejection::InvalidCode) => {
            return Ok(ScanResponse::invalid_code());
        }
        ScanDecision::Rejected(ScanRejection::AlreadyFound) => {
            return Ok(ScanResponse::already_found());
        }
        ScanDecision::Rejected(ScanRejection::OutOfSequence { expected_ordinal }) => {
            // The treasure exists, otherwise the token would be invalid.
            let scanned_ordinal = treasure.map(|t| t.ordinal).unwrap_or_default();
            return Ok(ScanResponse::out_of_sequence(
                scanned_ordinal,
                expected_ordinal,
            ));
        }
        ScanDecision::Match {
            treasure,
            elapsed_seconds,
            completes_hunt,
        } => (treasure, elapsed_seconds, completes_hunt),
    };

    let discovery = DiscoveryEntity {
        id: Uuid::new_v4(),
        game_session_id: session_id,
        treasure_id: found.id,
        treasure_ordinal: found.ordinal,
        discovered_at: now,
        time_taken_seconds: elapsed_seconds,
    };

    match store.insert_discovery(discovery).await {
        Ok(()) => {}
        // Uniqueness backstop tripped: another writer recorded this find
        // between our read and write. One success, one rejection.
        Err(StorageError::Duplicate { message }) => {
            warn!(session_id = %session_id, %message, "duplicate discovery rejected by store");
            return Ok(ScanResponse::already_found());
        }
        Err(err) => return Err(err.into()),
    }

    let message = if completes_hunt {
        session::complete(&mut game_session, now)?;
        state.config().completion_message()
    } else {
        session::advance(&mut game_session)?;
        state.config().found_message(&found.clue_text)
    };
    store.update_session(game_session.clone()).await?;

    if completes_hunt {
        info!(
            session_id = %session_id,
            total_time_seconds = game_session.total_time_seconds,
            "hunt completed"
        );
        state.release_session_gate(session_id);
    }

    Ok(ScanResponse::matched(&found, completes_hunt, message))
}

/// Abandon an active session. Terminal states reject further mutations.
pub async fn abandon_game(state: &SharedState, session_id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_hunt_store().await?;

    let gate = state.session_gate(session_id);
    let _guard = gate.lock().await;

    let Some(mut game_session) = store.find_session(session_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "game session `{session_id}` not found"
        )));
    };

    session::abandon(&mut game_session)?;
    store.update_session(game_session).await?;
    state.release_session_gate(session_id);
    info!(session_id = %session_id, "session abandoned");
    Ok(())
}

/// Delete a session; its discoveries cascade in the same store operation.
pub async fn delete_session(state: &SharedState, session_id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_hunt_store().await?;

    let gate = state.session_gate(session_id);
    let _guard = gate.lock().await;

    if store.find_session(session_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!(
            "game session `{session_id}` not found"
        )));
    }

    store.delete_session(session_id).await?;
    state.release_session_gate(session_id);
    info!(session_id = %session_id, "session deleted with its discoveries");
    Ok(())
}
