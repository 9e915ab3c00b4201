use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::{HuntEntity, HuntListItemEntity, TreasureEntity},
    dto::{format_system_time, validation::validate_clue_text},
};

/// Payload registering a hunt together with its ordered treasures.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateHuntRequest {
    /// Hunt title (1-100 characters).
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    /// Treasures in find-order; ordinals are assigned 1..N from this order.
    #[validate(nested)]
    pub treasures: Vec<TreasureInput>,
}

/// Incoming treasure definition for the hunt registration.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TreasureInput {
    /// Clue revealed when this treasure is found (at most 200 characters).
    pub clue_text: String,
    /// Optional explicit QR payload; generated when omitted.
    #[serde(default)]
    pub scan_token: Option<String>,
}

impl Validate for TreasureInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_clue_text(&self.clue_text) {
            errors.add("clue_text", e);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Admin projection of a treasure, including the QR payload to print.
#[derive(Debug, Serialize, ToSchema)]
pub struct TreasureSummary {
    /// Treasure identifier.
    pub id: Uuid,
    /// 1-based position within the hunt.
    pub ordinal: u32,
    /// QR payload to encode on the printed code.
    pub scan_token: String,
    /// Clue attached to the treasure.
    pub clue_text: String,
}

impl From<TreasureEntity> for TreasureSummary {
    fn from(treasure: TreasureEntity) -> Self {
        Self {
            id: treasure.id,
            ordinal: treasure.ordinal,
            scan_token: treasure.scan_token,
            clue_text: treasure.clue_text,
        }
    }
}

/// Summary returned once a hunt has been registered or fetched.
#[derive(Debug, Serialize, ToSchema)]
pub struct HuntSummary {
    /// Hunt identifier.
    pub id: Uuid,
    /// Hunt title.
    pub title: String,
    /// RFC3339 creation timestamp.
    pub created_at: String,
    /// Treasures ordered by ordinal.
    pub treasures: Vec<TreasureSummary>,
}

impl From<HuntEntity> for HuntSummary {
    fn from(hunt: HuntEntity) -> Self {
        Self {
            id: hunt.id,
            title: hunt.title,
            created_at: format_system_time(hunt.created_at),
            treasures: hunt.treasures.into_iter().map(Into::into).collect(),
        }
    }
}

/// Hunt listing entry without the treasure payloads.
#[derive(Debug, Serialize, ToSchema)]
pub struct HuntListItem {
    /// Hunt identifier.
    pub id: Uuid,
    /// Hunt title.
    pub title: String,
    /// RFC3339 creation timestamp.
    pub created_at: String,
    /// Number of treasures in the hunt.
    pub treasure_count: u32,
}

impl From<HuntListItemEntity> for HuntListItem {
    fn from(item: HuntListItemEntity) -> Self {
        Self {
            id: item.id,
            title: item.title,
            created_at: format_system_time(item.created_at),
            treasure_count: item.treasure_count,
        }
    }
}
