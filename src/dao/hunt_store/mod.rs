pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{
    DiscoveryEntity, GameSessionEntity, HuntEntity, HuntListItemEntity, SessionStatus,
};
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for the treasure catalog and the
/// game sessions with their discoveries.
pub trait HuntStore: Send + Sync {
    /// Upsert a hunt together with its ordered treasures.
    fn save_hunt(&self, hunt: HuntEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch a hunt with its treasures, ordered by ordinal.
    fn find_hunt(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<HuntEntity>>>;
    /// List all hunts without their treasure payloads.
    fn list_hunts(&self) -> BoxFuture<'static, StorageResult<Vec<HuntListItemEntity>>>;
    /// Look up a treasure by scan token, scoped to one hunt.
    fn find_treasure_by_token(
        &self,
        hunt_id: Uuid,
        token: String,
    ) -> BoxFuture<'static, StorageResult<Option<crate::dao::models::TreasureEntity>>>;

    /// Persist a freshly started session.
    fn create_session(&self, session: GameSessionEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch a session by id.
    fn find_session(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<GameSessionEntity>>>;
    /// Replace a session's persisted state.
    fn update_session(&self, session: GameSessionEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Delete a session and cascade-delete its discoveries.
    fn delete_session(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>>;

    /// List a session's discoveries ordered by treasure ordinal.
    fn session_discoveries(
        &self,
        session_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<DiscoveryEntity>>>;
    /// Insert a discovery; fails with [`StorageError::Duplicate`] when the
    /// (session, treasure) pair already exists.
    ///
    /// [`StorageError::Duplicate`]: crate::dao::storage::StorageError::Duplicate
    fn insert_discovery(
        &self,
        discovery: DiscoveryEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;

    /// Count sessions for a hunt, optionally filtered by status.
    fn count_sessions(
        &self,
        hunt_id: Uuid,
        status: Option<SessionStatus>,
    ) -> BoxFuture<'static, StorageResult<u64>>;
    /// Total times (seconds) of all completed sessions for a hunt.
    fn completed_session_times(
        &self,
        hunt_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<u64>>>;

    /// Cheap connectivity probe.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Attempt to re-establish a broken backend connection.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
