//! Shared application state: the installed storage backend, degraded-mode
//! signalling, and per-session serialization gates.

pub mod scan;
pub mod session;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock, watch};
use uuid::Uuid;

use crate::{config::AppConfig, dao::hunt_store::HuntStore, error::ServiceError};

/// Cheap-to-clone handle to [`AppState`].
pub type SharedState = Arc<AppState>;

/// Central application state shared by every request handler.
pub struct AppState {
    hunt_store: RwLock<Option<Arc<dyn HuntStore>>>,
    degraded: watch::Sender<bool>,
    // One gate per session: mutating operations on a session (scan, abandon)
    // serialize through its mutex so racing duplicate scans cannot both
    // advance the cursor.
    session_gates: DashMap<Uuid, Arc<Mutex<()>>>,
    config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            hunt_store: RwLock::new(None),
            degraded: degraded_tx,
            session_gates: DashMap::new(),
            config,
        })
    }

    /// Obtain a handle to the current hunt store, if one is installed.
    pub async fn hunt_store(&self) -> Option<Arc<dyn HuntStore>> {
        let guard = self.hunt_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the hunt store or fail with [`ServiceError::Degraded`].
    pub async fn require_hunt_store(&self) -> Result<Arc<dyn HuntStore>, ServiceError> {
        self.hunt_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new hunt store implementation and leave degraded mode.
    pub async fn set_hunt_store(&self, store: Arc<dyn HuntStore>) {
        {
            let mut guard = self.hunt_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Remove the current hunt store and enter degraded mode.
    pub async fn clear_hunt_store(&self) {
        {
            let mut guard = self.hunt_store.write().await;
            guard.take();
        }
        self.update_degraded(true).await;
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub async fn update_degraded(&self, value: bool) {
        if *self.degraded.borrow() == value {
            return;
        }
        let _ = self.degraded.send(value);
    }

    /// Gate serializing mutating operations on one session.
    pub fn session_gate(&self, session_id: Uuid) -> Arc<Mutex<()>> {
        self.session_gates
            .entry(session_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the gate of a session that reached a terminal state. Holders of
    /// an existing clone finish undisturbed.
    pub fn release_session_gate(&self, session_id: Uuid) {
        self.session_gates.remove(&session_id);
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
