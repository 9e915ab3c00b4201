//! In-process [`HuntStore`] used for tests and storage-free development runs.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{
    hunt_store::HuntStore,
    models::{
        DiscoveryEntity, GameSessionEntity, HuntEntity, HuntListItemEntity, SessionStatus,
        TreasureEntity,
    },
    storage::{StorageError, StorageResult},
};

/// Non-durable store keeping every entity in concurrent maps.
#[derive(Clone, Default)]
pub struct MemoryHuntStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    hunts: DashMap<Uuid, HuntEntity>,
    sessions: DashMap<Uuid, GameSessionEntity>,
    // Discoveries keyed by owning session so cascade-delete is a single removal.
    discoveries: DashMap<Uuid, Vec<DiscoveryEntity>>,
}

impl MemoryHuntStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl HuntStore for MemoryHuntStore {
    fn save_hunt(&self, hunt: HuntEntity) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.hunts.insert(hunt.id, hunt);
            Ok(())
        })
    }

    fn find_hunt(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<HuntEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.hunts.get(&id).map(|entry| entry.clone())) })
    }

    fn list_hunts(&self) -> BoxFuture<'static, StorageResult<Vec<HuntListItemEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut items = inner
                .hunts
                .iter()
                .map(|entry| HuntListItemEntity::from(entry.value()))
                .collect::<Vec<_>>();
            items.sort_by_key(|item| item.created_at);
            Ok(items)
        })
    }

    fn find_treasure_by_token(
        &self,
        hunt_id: Uuid,
        token: String,
    ) -> BoxFuture<'static, StorageResult<Option<TreasureEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let Some(hunt) = inner.hunts.get(&hunt_id) else {
                return Ok(None);
            };
            Ok(hunt
                .treasures
                .iter()
                .find(|treasure| treasure.scan_token == token)
                .cloned())
        })
    }

    fn create_session(&self, session: GameSessionEntity) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.sessions.insert(session.id, session);
            Ok(())
        })
    }

    fn find_session(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<GameSessionEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.sessions.get(&id).map(|entry| entry.clone())) })
    }

    fn update_session(&self, session: GameSessionEntity) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.sessions.insert(session.id, session);
            Ok(())
        })
    }

    fn delete_session(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.sessions.remove(&id);
            inner.discoveries.remove(&id);
            Ok(())
        })
    }

    fn session_discoveries(
        &self,
        session_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<DiscoveryEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut discoveries = inner
                .discoveries
                .get(&session_id)
                .map(|entry| entry.clone())
                .unwrap_or_default();
            discoveries.sort_by_key(|discovery| discovery.treasure_ordinal);
            Ok(discoveries)
        })
    }

    fn insert_discovery(
        &self,
        discovery: DiscoveryEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut entry = inner
                .discoveries
                .entry(discovery.game_session_id)
                .or_default();
            if entry
                .iter()
                .any(|existing| existing.treasure_id == discovery.treasure_id)
            {
                return Err(StorageError::duplicate(format!(
                    "discovery for treasure `{}` already recorded in session `{}`",
                    discovery.treasure_id, discovery.game_session_id
                )));
            }
            entry.push(discovery);
            Ok(())
        })
    }

    fn count_sessions(
        &self,
        hunt_id: Uuid,
        status: Option<SessionStatus>,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let count = inner
                .sessions
                .iter()
                .filter(|entry| entry.hunt_id == hunt_id)
                .filter(|entry| status.is_none_or(|wanted| entry.status == wanted))
                .count();
            Ok(count as u64)
        })
    }

    fn completed_session_times(
        &self,
        hunt_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<u64>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            Ok(inner
                .sessions
                .iter()
                .filter(|entry| {
                    entry.hunt_id == hunt_id && entry.status == SessionStatus::Completed
                })
                .map(|entry| entry.total_time_seconds)
                .collect())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
