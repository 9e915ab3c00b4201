//! MongoDB store keeping hunts (with embedded treasures), sessions, and
//! discoveries in three collections.

use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database,
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{
        MongoDiscoveryDocument, MongoHuntDocument, MongoSessionDocument, doc_id, status_str,
        uuid_as_binary,
    },
};
use crate::dao::{
    hunt_store::HuntStore,
    models::{
        DiscoveryEntity, GameSessionEntity, HuntEntity, HuntListItemEntity, SessionStatus,
        TreasureEntity,
    },
    storage::{StorageError, StorageResult},
};

const HUNT_COLLECTION_NAME: &str = "hunts";
const SESSION_COLLECTION_NAME: &str = "game_sessions";
const DISCOVERY_COLLECTION_NAME: &str = "discoveries";

/// Clonable handle to the MongoDB-backed hunt store.
#[derive(Clone)]
pub struct MongoHuntStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoHuntStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;

        // Scan tokens are unique across the whole catalog.
        let hunts = database.collection::<mongodb::bson::Document>(HUNT_COLLECTION_NAME);
        let token_index = mongodb::IndexModel::builder()
            .keys(doc! {"treasures.scan_token": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("treasure_scan_token_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();
        hunts
            .create_index(token_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: HUNT_COLLECTION_NAME,
                index: "treasures.scan_token",
                source,
            })?;

        // Stats queries filter sessions by (hunt_id, status).
        let sessions = database.collection::<mongodb::bson::Document>(SESSION_COLLECTION_NAME);
        let session_index = mongodb::IndexModel::builder()
            .keys(doc! {"hunt_id": 1, "status": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("session_hunt_status_idx".to_owned()))
                    .build(),
            )
            .build();
        sessions
            .create_index(session_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: SESSION_COLLECTION_NAME,
                index: "hunt_id,status",
                source,
            })?;

        // Backstop for the idempotent-rescan guarantee: one discovery per
        // (session, treasure) even if two writers race past the validator.
        let discoveries =
            database.collection::<mongodb::bson::Document>(DISCOVERY_COLLECTION_NAME);
        let discovery_index = mongodb::IndexModel::builder()
            .keys(doc! {"game_session_id": 1, "treasure_id": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("discovery_session_treasure_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();
        discoveries
            .create_index(discovery_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: DISCOVERY_COLLECTION_NAME,
                index: "game_session_id,treasure_id",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn hunt_collection(&self) -> Collection<MongoHuntDocument> {
        self.database()
            .await
            .collection::<MongoHuntDocument>(HUNT_COLLECTION_NAME)
    }

    async fn session_collection(&self) -> Collection<MongoSessionDocument> {
        self.database()
            .await
            .collection::<MongoSessionDocument>(SESSION_COLLECTION_NAME)
    }

    async fn discovery_collection(&self) -> Collection<MongoDiscoveryDocument> {
        self.database()
            .await
            .collection::<MongoDiscoveryDocument>(DISCOVERY_COLLECTION_NAME)
    }

    async fn save_hunt(&self, hunt: HuntEntity) -> MongoResult<()> {
        let id = hunt.id;
        let document: MongoHuntDocument = hunt.into();
        let collection = self.hunt_collection().await;
        collection
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveHunt { id, source })?;
        Ok(())
    }

    async fn find_hunt(&self, id: Uuid) -> MongoResult<Option<HuntEntity>> {
        let collection = self.hunt_collection().await;
        let document = collection
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadHunt { id, source })?;
        Ok(document.map(Into::into))
    }

    async fn list_hunts(&self) -> MongoResult<Vec<HuntListItemEntity>> {
        let collection = self.hunt_collection().await;
        let documents: Vec<MongoHuntDocument> = collection
            .find(doc! {})
            .await
            .map_err(|source| MongoDaoError::ListHunts { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListHunts { source })?;

        Ok(documents
            .into_iter()
            .map(|document| {
                let entity: HuntEntity = document.into();
                HuntListItemEntity::from(&entity)
            })
            .collect())
    }

    async fn find_treasure_by_token(
        &self,
        hunt_id: Uuid,
        token: &str,
    ) -> MongoResult<Option<TreasureEntity>> {
        // Treasures are embedded in the hunt document; the per-hunt treasure
        // count is small, so filtering in process is cheaper than an
        // aggregation round-trip.
        let Some(hunt) = self.find_hunt(hunt_id).await? else {
            return Ok(None);
        };
        Ok(hunt
            .treasures
            .into_iter()
            .find(|treasure| treasure.scan_token == token))
    }

    async fn save_session(&self, session: GameSessionEntity) -> MongoResult<()> {
        let id = session.id;
        let document: MongoSessionDocument = session.into();
        let collection = self.session_collection().await;
        collection
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveSession { id, source })?;
        Ok(())
    }

    async fn find_session(&self, id: Uuid) -> MongoResult<Option<GameSessionEntity>> {
        let collection = self.session_collection().await;
        let document = collection
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadSession { id, source })?;
        Ok(document.map(Into::into))
    }

    async fn delete_session(&self, id: Uuid) -> MongoResult<()> {
        // Explicit cascade: the session owns its discoveries.
        let discoveries = self.discovery_collection().await;
        discoveries
            .delete_many(doc! {"game_session_id": uuid_as_binary(id)})
            .await
            .map_err(|source| MongoDaoError::DeleteSession { id, source })?;

        let sessions = self.session_collection().await;
        sessions
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteSession { id, source })?;
        Ok(())
    }

    async fn session_discoveries(&self, session_id: Uuid) -> MongoResult<Vec<DiscoveryEntity>> {
        let collection = self.discovery_collection().await;
        let documents: Vec<MongoDiscoveryDocument> = collection
            .find(doc! {"game_session_id": uuid_as_binary(session_id)})
            .sort(doc! {"treasure_ordinal": 1})
            .await
            .map_err(|source| MongoDaoError::LoadDiscoveries { session_id, source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadDiscoveries { session_id, source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn count_sessions(
        &self,
        hunt_id: Uuid,
        status: Option<SessionStatus>,
    ) -> MongoResult<u64> {
        let collection = self.session_collection().await;
        let mut filter = doc! {"hunt_id": uuid_as_binary(hunt_id)};
        if let Some(status) = status {
            filter.insert("status", status_str(status));
        }
        collection
            .count_documents(filter)
            .await
            .map_err(|source| MongoDaoError::CountSessions { hunt_id, source })
    }

    async fn completed_session_times(&self, hunt_id: Uuid) -> MongoResult<Vec<u64>> {
        let collection = self.session_collection().await;
        let documents: Vec<MongoSessionDocument> = collection
            .find(doc! {
                "hunt_id": uuid_as_binary(hunt_id),
                "status": status_str(SessionStatus::Completed),
            })
            .await
            .map_err(|source| MongoDaoError::CountSessions { hunt_id, source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::CountSessions { hunt_id, source })?;

        Ok(documents
            .into_iter()
            .map(|document| GameSessionEntity::from(document).total_time_seconds)
            .collect())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) if write_error.code == 11000
    )
}

impl HuntStore for MongoHuntStore {
    fn save_hunt(&self, hunt: HuntEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_hunt(hunt).await.map_err(Into::into) })
    }

    fn find_hunt(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<HuntEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_hunt(id).await.map_err(Into::into) })
    }

    fn list_hunts(&self) -> BoxFuture<'static, StorageResult<Vec<HuntListItemEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_hunts().await.map_err(Into::into) })
    }

    fn find_treasure_by_token(
        &self,
        hunt_id: Uuid,
        token: String,
    ) -> BoxFuture<'static, StorageResult<Option<TreasureEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_treasure_by_token(hunt_id, &token)
                .await
                .map_err(Into::into)
        })
    }

    fn create_session(&self, session: GameSessionEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_session(session).await.map_err(Into::into) })
    }

    fn find_session(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<GameSessionEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_session(id).await.map_err(Into::into) })
    }

    fn update_session(&self, session: GameSessionEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_session(session).await.map_err(Into::into) })
    }

    fn delete_session(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.delete_session(id).await.map_err(Into::into) })
    }

    fn session_discoveries(
        &self,
        session_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<DiscoveryEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .session_discoveries(session_id)
                .await
                .map_err(Into::into)
        })
    }

    fn insert_discovery(
        &self,
        discovery: DiscoveryEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let session_id = discovery.game_session_id;
            let treasure_id = discovery.treasure_id;
            let document: MongoDiscoveryDocument = discovery.into();
            let collection = store.discovery_collection().await;
            match collection.insert_one(&document).await {
                Ok(_) => Ok(()),
                Err(err) if is_duplicate_key(&err) => Err(StorageError::duplicate(format!(
                    "discovery for treasure `{treasure_id}` already recorded in session `{session_id}`"
                ))),
                Err(source) => Err(MongoDaoError::SaveDiscovery { session_id, source }.into()),
            }
        })
    }

    fn count_sessions(
        &self,
        hunt_id: Uuid,
        status: Option<SessionStatus>,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .count_sessions(hunt_id, status)
                .await
                .map_err(Into::into)
        })
    }

    fn completed_session_times(
        &self,
        hunt_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<u64>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .completed_session_times(hunt_id)
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
