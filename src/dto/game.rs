use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::{DiscoveryEntity, GameSessionEntity, HuntEntity, SessionStatus, TreasureEntity},
    dto::format_system_time,
    dto::validation::{validate_player_name, validate_scan_token},
    state::session,
};

/// Payload used to start a session on a hunt.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StartGameRequest {
    /// Display name of the player (1-50 characters).
    pub player_name: String,
}

impl Validate for StartGameRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_player_name(&self.player_name) {
            errors.add("player_name", e);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Payload carrying one scanned QR code.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScanRequest {
    /// Opaque token decoded from the QR code.
    pub scan_token: String,
}

impl Validate for ScanRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_scan_token(&self.scan_token) {
            errors.add("scan_token", e);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Machine-readable reason attached to a rejected scan.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScanReason {
    /// No treasure in this hunt carries the scanned token.
    InvalidCode,
    /// The treasure was already found in this session.
    AlreadyFound,
    /// The treasure lies ahead of the expected one.
    OutOfSequence,
}

/// Outcome of a scan. Rejections use the same 200 response shape as
/// successes; they are ordinary gameplay events, not errors.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanResponse {
    /// Whether the scan advanced the hunt.
    pub success: bool,
    /// Reason code, present on rejections only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ScanReason>,
    /// Ordinal the player must find next, present on out-of-sequence rejections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_ordinal: Option<u32>,
    /// The found treasure, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treasure: Option<TreasureView>,
    /// Clue pointing at the next treasure, present on non-final successes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clue: Option<String>,
    /// Whether this scan completed the hunt, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_game_complete: Option<bool>,
    /// Human-readable message for direct display.
    pub message: String,
}

impl ScanResponse {
    /// Rejection for a token unknown to this hunt.
    pub fn invalid_code() -> Self {
        Self::rejection(
            ScanReason::InvalidCode,
            None,
            "Invalid QR code or treasure not found for this hunt".into(),
        )
    }

    /// Rejection for a treasure that was already found.
    pub fn already_found() -> Self {
        Self::rejection(
            ScanReason::AlreadyFound,
            None,
            "You have already found this treasure! Look for the next one.".into(),
        )
    }

    /// Rejection for a treasure scanned ahead of the sequence.
    pub fn out_of_sequence(scanned_ordinal: u32, expected_ordinal: u32) -> Self {
        Self::rejection(
            ScanReason::OutOfSequence,
            Some(expected_ordinal),
            format!(
                "This is treasure #{scanned_ordinal}, but you need to find treasure #{expected_ordinal} first!"
            ),
        )
    }

    /// Successful scan carrying the found treasure and the follow-up message.
    pub fn matched(
        treasure: &TreasureEntity,
        is_game_complete: bool,
        message: String,
    ) -> Self {
        Self {
            success: true,
            reason: None,
            expected_ordinal: None,
            treasure: Some(treasure.into()),
            clue: Some(treasure.clue_text.clone()),
            is_game_complete: Some(is_game_complete),
            message,
        }
    }

    fn rejection(reason: ScanReason, expected_ordinal: Option<u32>, message: String) -> Self {
        Self {
            success: false,
            reason: Some(reason),
            expected_ordinal,
            treasure: None,
            clue: None,
            is_game_complete: None,
            message,
        }
    }
}

/// Public projection of a treasure; never exposes the scan token.
#[derive(Debug, Serialize, ToSchema)]
pub struct TreasureView {
    /// Treasure identifier.
    pub id: Uuid,
    /// 1-based position within the hunt.
    pub ordinal: u32,
    /// Clue attached to the treasure.
    pub clue_text: String,
}

impl From<&TreasureEntity> for TreasureView {
    fn from(treasure: &TreasureEntity) -> Self {
        Self {
            id: treasure.id,
            ordinal: treasure.ordinal,
            clue_text: treasure.clue_text.clone(),
        }
    }
}

/// One recorded find inside a session view.
#[derive(Debug, Serialize, ToSchema)]
pub struct DiscoveryView {
    /// The found treasure with its clue.
    pub treasure: TreasureView,
    /// RFC3339 timestamp of the find.
    pub discovered_at: String,
    /// Whole seconds spent on this treasure.
    pub time_taken_seconds: u64,
}

/// Full session projection returned by the session endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionView {
    /// Session identifier.
    pub id: Uuid,
    /// Hunt this session plays.
    pub hunt_id: Uuid,
    /// Player display name.
    pub player_name: String,
    /// Current lifecycle status.
    pub status: SessionStatus,
    /// 1-based ordinal of the next expected treasure.
    pub current_ordinal: u32,
    /// Hunt size snapshot taken at session start.
    pub total_treasures: u32,
    /// RFC3339 start timestamp.
    pub started_at: String,
    /// RFC3339 completion timestamp, if completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    /// Whole seconds from start to completion (0 until completed).
    pub total_time_seconds: u64,
    /// Completed share of the hunt as a whole percentage.
    pub progress_percentage: u8,
    /// Recorded finds, ordered by treasure ordinal.
    pub discoveries: Vec<DiscoveryView>,
}

impl From<(GameSessionEntity, Vec<DiscoveryEntity>, HuntEntity)> for SessionView {
    fn from(
        (session, discoveries, hunt): (GameSessionEntity, Vec<DiscoveryEntity>, HuntEntity),
    ) -> Self {
        let discoveries = discoveries
            .into_iter()
            .filter_map(|discovery| {
                let treasure = hunt
                    .treasures
                    .iter()
                    .find(|treasure| treasure.id == discovery.treasure_id)?;
                Some(DiscoveryView {
                    treasure: treasure.into(),
                    discovered_at: format_system_time(discovery.discovered_at),
                    time_taken_seconds: discovery.time_taken_seconds,
                })
            })
            .collect();

        Self {
            id: session.id,
            hunt_id: session.hunt_id,
            player_name: session.player_name.clone(),
            status: session.status,
            current_ordinal: session.current_ordinal,
            total_treasures: session.total_treasures,
            started_at: format_system_time(session.started_at),
            completed_at: session.completed_at.map(format_system_time),
            total_time_seconds: session.total_time_seconds,
            progress_percentage: session::progress_percentage(&session),
            discoveries,
        }
    }
}

/// Hunt-wide aggregate metrics.
#[derive(Debug, Serialize, PartialEq, ToSchema)]
pub struct StatsResponse {
    /// Sessions started on the hunt, any status.
    pub total_sessions: u64,
    /// Sessions that found every treasure.
    pub completed_sessions: u64,
    /// Mean completion time in whole seconds, 0 without completed sessions.
    pub average_completion_time: u64,
    /// Completed share of all sessions as a percentage, 2 decimal places.
    pub completion_rate: f64,
}
