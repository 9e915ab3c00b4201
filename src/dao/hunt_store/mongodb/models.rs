use mongodb::bson::{Binary, DateTime, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{
    DiscoveryEntity, GameSessionEntity, HuntEntity, SessionStatus, TreasureEntity,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoHuntDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    title: String,
    created_at: DateTime,
    treasures: Vec<TreasureEntity>,
}

impl From<HuntEntity> for MongoHuntDocument {
    fn from(value: HuntEntity) -> Self {
        Self {
            id: value.id,
            title: value.title,
            created_at: DateTime::from_system_time(value.created_at),
            treasures: value.treasures,
        }
    }
}

impl From<MongoHuntDocument> for HuntEntity {
    fn from(value: MongoHuntDocument) -> Self {
        let mut treasures = value.treasures;
        treasures.sort_by_key(|treasure| treasure.ordinal);
        Self {
            id: value.id,
            title: value.title,
            created_at: value.created_at.to_system_time(),
            treasures,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSessionDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    hunt_id: Uuid,
    player_name: String,
    status: SessionStatus,
    current_ordinal: u32,
    total_treasures: u32,
    started_at: DateTime,
    completed_at: Option<DateTime>,
    total_time_seconds: u64,
}

impl From<GameSessionEntity> for MongoSessionDocument {
    fn from(value: GameSessionEntity) -> Self {
        Self {
            id: value.id,
            hunt_id: value.hunt_id,
            player_name: value.player_name,
            status: value.status,
            current_ordinal: value.current_ordinal,
            total_treasures: value.total_treasures,
            started_at: DateTime::from_system_time(value.started_at),
            completed_at: value.completed_at.map(DateTime::from_system_time),
            total_time_seconds: value.total_time_seconds,
        }
    }
}

impl From<MongoSessionDocument> for GameSessionEntity {
    fn from(value: MongoSessionDocument) -> Self {
        Self {
            id: value.id,
            hunt_id: value.hunt_id,
            player_name: value.player_name,
            status: value.status,
            current_ordinal: value.current_ordinal,
            total_treasures: value.total_treasures,
            started_at: value.started_at.to_system_time(),
            completed_at: value.completed_at.map(|at| at.to_system_time()),
            total_time_seconds: value.total_time_seconds,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoDiscoveryDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    game_session_id: Uuid,
    treasure_id: Uuid,
    treasure_ordinal: u32,
    discovered_at: DateTime,
    time_taken_seconds: u64,
}

impl From<DiscoveryEntity> for MongoDiscoveryDocument {
    fn from(value: DiscoveryEntity) -> Self {
        Self {
            id: value.id,
            game_session_id: value.game_session_id,
            treasure_id: value.treasure_id,
            treasure_ordinal: value.treasure_ordinal,
            discovered_at: DateTime::from_system_time(value.discovered_at),
            time_taken_seconds: value.time_taken_seconds,
        }
    }
}

impl From<MongoDiscoveryDocument> for DiscoveryEntity {
    fn from(value: MongoDiscoveryDocument) -> Self {
        Self {
            id: value.id,
            game_session_id: value.game_session_id,
            treasure_id: value.treasure_id,
            treasure_ordinal: value.treasure_ordinal,
            discovered_at: value.discovered_at.to_system_time(),
            time_taken_seconds: value.time_taken_seconds,
        }
    }
}

pub fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}

/// BSON string used for status equality filters; must match the serde
/// rename on [`SessionStatus`].
pub fn status_str(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Active => "active",
        SessionStatus::Completed => "completed",
        SessionStatus::Abandoned => "abandoned",
    }
}
