//! End-to-end service-layer scenarios against the in-memory store.

use std::sync::Arc;
use std::time::SystemTime;

use uuid::Uuid;

use treasure_hunt_back::{
    config::AppConfig,
    dao::{
        hunt_store::{HuntStore, memory::MemoryHuntStore},
        models::{GameSessionEntity, SessionStatus},
    },
    dto::{
        game::{ScanReason, ScanRequest, StartGameRequest},
        hunt::{CreateHuntRequest, TreasureInput},
    },
    error::ServiceError,
    services::{catalog_service, game_service, stats_service},
    state::{AppState, SharedState},
};

async fn state_with_store() -> (SharedState, Arc<MemoryHuntStore>) {
    let store = Arc::new(MemoryHuntStore::new());
    let state = AppState::new(AppConfig::default());
    state
        .set_hunt_store(store.clone() as Arc<dyn HuntStore>)
        .await;
    (state, store)
}

fn treasure(clue: &str, token: &str) -> TreasureInput {
    TreasureInput {
        clue_text: clue.into(),
        scan_token: Some(token.into()),
    }
}

fn start_request(name: &str) -> StartGameRequest {
    StartGameRequest {
        player_name: name.into(),
    }
}

fn scan_request(token: &str) -> ScanRequest {
    ScanRequest {
        scan_token: token.into(),
    }
}

async fn register_pirate_cove(state: &SharedState) -> Uuid {
    let hunt = catalog_service::create_hunt(
        state,
        CreateHuntRequest {
            title: "Pirate Cove".into(),
            treasures: vec![
                treasure("Where the gulls nest", "T1"),
                treasure("Under the old anchor", "T2"),
            ],
        },
    )
    .await
    .expect("hunt registration");
    hunt.id
}

#[tokio::test]
async fn pirate_cove_scenario() {
    let (state, _) = state_with_store().await;
    let hunt_id = register_pirate_cove(&state).await;

    let session = game_service::start_game(&state, hunt_id, start_request("Ada"))
        .await
        .expect("start");
    assert_eq!(session.current_ordinal, 1);
    assert_eq!(session.total_treasures, 2);
    assert_eq!(session.status, SessionStatus::Active);
    assert_eq!(session.progress_percentage, 0);

    // Scanning the second treasure first is out of sequence.
    let outcome = game_service::scan_code(&state, session.id, scan_request("T2"))
        .await
        .expect("scan");
    assert!(!outcome.success);
    assert_eq!(outcome.reason, Some(ScanReason::OutOfSequence));
    assert_eq!(outcome.expected_ordinal, Some(1));

    // Correct first treasure.
    let outcome = game_service::scan_code(&state, session.id, scan_request("T1"))
        .await
        .expect("scan");
    assert!(outcome.success);
    assert_eq!(outcome.is_game_complete, Some(false));
    assert_eq!(outcome.clue.as_deref(), Some("Where the gulls nest"));

    let view = game_service::get_session(&state, session.id)
        .await
        .expect("get");
    assert_eq!(view.current_ordinal, 2);
    assert_eq!(view.progress_percentage, 50);
    assert_eq!(view.discoveries.len(), 1);

    // Re-scanning the found treasure is rejected.
    let outcome = game_service::scan_code(&state, session.id, scan_request("T1"))
        .await
        .expect("scan");
    assert!(!outcome.success);
    assert_eq!(outcome.reason, Some(ScanReason::AlreadyFound));

    // Final treasure completes the hunt.
    let outcome = game_service::scan_code(&state, session.id, scan_request("T2"))
        .await
        .expect("scan");
    assert!(outcome.success);
    assert_eq!(outcome.is_game_complete, Some(true));

    let view = game_service::get_session(&state, session.id)
        .await
        .expect("get");
    assert_eq!(view.status, SessionStatus::Completed);
    assert!(view.completed_at.is_some());
    assert_eq!(view.progress_percentage, 100);
    assert_eq!(view.discoveries.len(), 2);

    // Completed sessions accept no further scans.
    let err = game_service::scan_code(&state, session.id, scan_request("T1"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));
}

#[tokio::test]
async fn unknown_token_is_rejected_not_errored() {
    let (state, _) = state_with_store().await;
    let hunt_id = register_pirate_cove(&state).await;
    let session = game_service::start_game(&state, hunt_id, start_request("Ada"))
        .await
        .expect("start");

    let outcome = game_service::scan_code(&state, session.id, scan_request("nope"))
        .await
        .expect("scan");
    assert!(!outcome.success);
    assert_eq!(outcome.reason, Some(ScanReason::InvalidCode));
}

#[tokio::test]
async fn token_lookup_is_scoped_to_the_sessions_hunt() {
    let (state, _) = state_with_store().await;
    let cove_id = register_pirate_cove(&state).await;

    let other = catalog_service::create_hunt(
        &state,
        CreateHuntRequest {
            title: "Smugglers Bay".into(),
            treasures: vec![treasure("Behind the dunes", "B1")],
        },
    )
    .await
    .expect("hunt registration");

    let session = game_service::start_game(&state, cove_id, start_request("Ada"))
        .await
        .expect("start");

    // A token valid in another hunt is still invalid here.
    let outcome = game_service::scan_code(&state, session.id, scan_request("B1"))
        .await
        .expect("scan");
    assert_eq!(outcome.reason, Some(ScanReason::InvalidCode));

    // And it still works within its own hunt.
    let other_session = game_service::start_game(&state, other.id, start_request("Bob"))
        .await
        .expect("start");
    let outcome = game_service::scan_code(&state, other_session.id, scan_request("B1"))
        .await
        .expect("scan");
    assert!(outcome.success);
}

#[tokio::test]
async fn starting_an_empty_hunt_fails_without_creating_a_session() {
    let (state, _) = state_with_store().await;
    let hunt = catalog_service::create_hunt(
        &state,
        CreateHuntRequest {
            title: "Empty".into(),
            treasures: vec![],
        },
    )
    .await
    .expect("hunt registration");

    let err = game_service::start_game(&state, hunt.id, start_request("Ada"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));

    let stats = stats_service::hunt_stats(&state, hunt.id)
        .await
        .expect("stats");
    assert_eq!(stats.total_sessions, 0);
}

#[tokio::test]
async fn starting_an_unknown_hunt_is_not_found() {
    let (state, _) = state_with_store().await;
    let err = game_service::start_game(&state, Uuid::new_v4(), start_request("Ada"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn fetching_an_unknown_session_is_not_found() {
    let (state, _) = state_with_store().await;
    let err = game_service::get_session(&state, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn abandon_is_terminal() {
    let (state, _) = state_with_store().await;
    let hunt_id = register_pirate_cove(&state).await;
    let session = game_service::start_game(&state, hunt_id, start_request("Ada"))
        .await
        .expect("start");

    game_service::abandon_game(&state, session.id)
        .await
        .expect("abandon");

    let view = game_service::get_session(&state, session.id)
        .await
        .expect("get");
    assert_eq!(view.status, SessionStatus::Abandoned);

    let err = game_service::abandon_game(&state, session.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));

    let err = game_service::scan_code(&state, session.id, scan_request("T1"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));
}

#[tokio::test]
async fn rapid_duplicate_scans_yield_one_discovery() {
    let (state, _) = state_with_store().await;
    let hunt_id = register_pirate_cove(&state).await;
    let session = game_service::start_game(&state, hunt_id, start_request("Ada"))
        .await
        .expect("start");

    let (first, second) = tokio::join!(
        game_service::scan_code(&state, session.id, scan_request("T1")),
        game_service::scan_code(&state, session.id, scan_request("T1")),
    );
    let first = first.expect("scan");
    let second = second.expect("scan");

    let successes = [&first, &second].iter().filter(|o| o.success).count();
    assert_eq!(successes, 1);
    let rejected = if first.success { &second } else { &first };
    assert_eq!(rejected.reason, Some(ScanReason::AlreadyFound));

    let view = game_service::get_session(&state, session.id)
        .await
        .expect("get");
    assert_eq!(view.discoveries.len(), 1);
    assert_eq!(view.current_ordinal, 2);
}

#[tokio::test]
async fn deleting_a_session_cascades_its_discoveries() {
    let (state, store) = state_with_store().await;
    let hunt_id = register_pirate_cove(&state).await;
    let session = game_service::start_game(&state, hunt_id, start_request("Ada"))
        .await
        .expect("start");
    game_service::scan_code(&state, session.id, scan_request("T1"))
        .await
        .expect("scan");

    game_service::delete_session(&state, session.id)
        .await
        .expect("delete");

    let err = game_service::get_session(&state, session.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    let orphaned = store
        .session_discoveries(session.id)
        .await
        .expect("discoveries");
    assert!(orphaned.is_empty());
}

#[tokio::test]
async fn stats_aggregate_completed_sessions_only() {
    let (state, store) = state_with_store().await;
    let hunt_id = register_pirate_cove(&state).await;

    let stats = stats_service::hunt_stats(&state, hunt_id)
        .await
        .expect("stats");
    assert_eq!(stats.total_sessions, 0);
    assert_eq!(stats.completed_sessions, 0);
    assert_eq!(stats.average_completion_time, 0);
    assert_eq!(stats.completion_rate, 0.0);

    let times = [100u64, 110, 120, 130, 140, 150];
    for (index, time) in times.iter().enumerate() {
        store
            .create_session(GameSessionEntity {
                id: Uuid::new_v4(),
                hunt_id,
                player_name: format!("finisher-{index}"),
                status: SessionStatus::Completed,
                current_ordinal: 3,
                total_treasures: 2,
                started_at: SystemTime::now(),
                completed_at: Some(SystemTime::now()),
                total_time_seconds: *time,
            })
            .await
            .expect("session");
    }
    for index in 0..4u32 {
        store
            .create_session(GameSessionEntity {
                id: Uuid::new_v4(),
                hunt_id,
                player_name: format!("quitter-{index}"),
                status: SessionStatus::Abandoned,
                current_ordinal: 1,
                total_treasures: 2,
                started_at: SystemTime::now(),
                completed_at: None,
                total_time_seconds: 0,
            })
            .await
            .expect("session");
    }

    let stats = stats_service::hunt_stats(&state, hunt_id)
        .await
        .expect("stats");
    assert_eq!(stats.total_sessions, 10);
    assert_eq!(stats.completed_sessions, 6);
    assert_eq!(stats.average_completion_time, 125);
    assert_eq!(stats.completion_rate, 60.00);
}
