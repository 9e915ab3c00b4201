use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Hunt definition containing its ordered treasures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HuntEntity {
    /// Stable identifier for the hunt.
    pub id: Uuid,
    /// Human readable hunt title.
    pub title: String,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Treasures making up the hunt, sorted by ordinal (contiguous 1..N).
    pub treasures: Vec<TreasureEntity>,
}

/// One stop in a hunt, identified by its scan token and paired with a clue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreasureEntity {
    /// Stable identifier for the treasure.
    pub id: Uuid,
    /// 1-based position of the treasure within its hunt.
    pub ordinal: u32,
    /// Opaque string encoded in the treasure's QR code, unique per catalog.
    pub scan_token: String,
    /// Clue text revealed when the treasure is found.
    pub clue_text: String,
}

/// Lifecycle status of a game session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// The player is still hunting; scans are accepted.
    Active,
    /// Every treasure was found; terminal.
    Completed,
    /// The player gave up; terminal.
    Abandoned,
}

impl SessionStatus {
    /// Whether the session still accepts gameplay mutations.
    pub fn is_active(self) -> bool {
        matches!(self, SessionStatus::Active)
    }

    /// Whether the session reached a terminal state.
    pub fn is_terminal(self) -> bool {
        !self.is_active()
    }
}

/// One player's attempt at a hunt, persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSessionEntity {
    /// Primary key of the session.
    pub id: Uuid,
    /// Hunt this session plays.
    pub hunt_id: Uuid,
    /// Display name chosen by the player.
    pub player_name: String,
    /// Current lifecycle status.
    pub status: SessionStatus,
    /// 1-based ordinal of the next treasure expected.
    pub current_ordinal: u32,
    /// Snapshot of the hunt size taken at session start.
    pub total_treasures: u32,
    /// When the session was started.
    pub started_at: SystemTime,
    /// When the session was completed, if it was.
    pub completed_at: Option<SystemTime>,
    /// Whole seconds from start to completion (0 until completed).
    pub total_time_seconds: u64,
}

/// Record of one treasure successfully found within a session.
///
/// At most one discovery exists per (session, treasure) pair; the store
/// enforces this with a uniqueness constraint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscoveryEntity {
    /// Primary key of the discovery.
    pub id: Uuid,
    /// Session that owns this discovery.
    pub game_session_id: Uuid,
    /// Treasure that was found.
    pub treasure_id: Uuid,
    /// Ordinal of the treasure at discovery time (denormalized).
    pub treasure_ordinal: u32,
    /// When the treasure was scanned.
    pub discovered_at: SystemTime,
    /// Whole seconds elapsed since the previous discovery, or since session
    /// start for the first one.
    pub time_taken_seconds: u64,
}

/// Hunt list item (subset of [`HuntEntity`]) returned by listing queries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HuntListItemEntity {
    /// Primary key of the hunt.
    pub id: Uuid,
    /// Human readable hunt title.
    pub title: String,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Number of treasures in the hunt.
    pub treasure_count: u32,
}

impl From<&HuntEntity> for HuntListItemEntity {
    fn from(hunt: &HuntEntity) -> Self {
        Self {
            id: hunt.id,
            title: hunt.title.clone(),
            created_at: hunt.created_at,
            treasure_count: hunt.treasures.len() as u32,
        }
    }
}
