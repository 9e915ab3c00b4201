//! Error types shared by the MongoDB storage implementation.

use thiserror::Error;
use uuid::Uuid;

/// Convenient result alias returning [`MongoDaoError`] failures.
pub type MongoResult<T> = Result<T, MongoDaoError>;

/// Failures that can occur while interacting with MongoDB.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// Required environment variable is missing.
    #[error("missing MongoDB environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    /// Connection string could not be parsed.
    #[error("invalid MongoDB URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: mongodb::error::Error,
    },
    /// Client construction failed.
    #[error("failed to construct MongoDB client")]
    ClientConstruction {
        #[source]
        source: mongodb::error::Error,
    },
    /// The server never answered the initial ping.
    #[error("MongoDB did not answer the initial ping after {attempts} attempts")]
    InitialPing {
        attempts: u32,
        #[source]
        source: mongodb::error::Error,
    },
    /// Index creation failed.
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: mongodb::error::Error,
    },
    /// A hunt document could not be written.
    #[error("failed to save hunt `{id}`")]
    SaveHunt {
        id: Uuid,
        #[source]
        source: mongodb::error::Error,
    },
    /// A hunt document could not be read.
    #[error("failed to load hunt `{id}`")]
    LoadHunt {
        id: Uuid,
        #[source]
        source: mongodb::error::Error,
    },
    /// The hunt listing query failed.
    #[error("failed to list hunts")]
    ListHunts {
        #[source]
        source: mongodb::error::Error,
    },
    /// A session document could not be written.
    #[error("failed to save game session `{id}`")]
    SaveSession {
        id: Uuid,
        #[source]
        source: mongodb::error::Error,
    },
    /// A session document could not be read.
    #[error("failed to load game session `{id}`")]
    LoadSession {
        id: Uuid,
        #[source]
        source: mongodb::error::Error,
    },
    /// A session (or its discoveries) could not be deleted.
    #[error("failed to delete game session `{id}`")]
    DeleteSession {
        id: Uuid,
        #[source]
        source: mongodb::error::Error,
    },
    /// A discovery document could not be written.
    #[error("failed to save discovery for session `{session_id}`")]
    SaveDiscovery {
        session_id: Uuid,
        #[source]
        source: mongodb::error::Error,
    },
    /// Discovery documents could not be read.
    #[error("failed to load discoveries for session `{session_id}`")]
    LoadDiscoveries {
        session_id: Uuid,
        #[source]
        source: mongodb::error::Error,
    },
    /// A session count/aggregate query failed.
    #[error("failed to count sessions for hunt `{hunt_id}`")]
    CountSessions {
        hunt_id: Uuid,
        #[source]
        source: mongodb::error::Error,
    },
    /// Health ping failed.
    #[error("MongoDB health ping failed")]
    HealthPing {
        #[source]
        source: mongodb::error::Error,
    },
}
