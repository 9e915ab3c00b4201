//! Keeps the storage backend connected and the degraded flag accurate.

use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    dao::{hunt_store::HuntStore, storage::StorageError},
    state::SharedState,
};

const INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const MAX_DELAY: Duration = Duration::from_secs(10);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Connect with exponential backoff, then poll the store's health. A failed
/// poll first tries an in-place reconnect; if that fails too, the state
/// flips to degraded and connection starts over.
pub async fn run<F, Fut>(state: SharedState, mut connect: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn HuntStore>, StorageError>> + Send,
{
    let mut delay = INITIAL_DELAY;

    loop {
        let store = match connect().await {
            Ok(store) => store,
            Err(err) => {
                warn!(error = %err, "storage connection attempt failed");
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
                continue;
            }
        };

        state.set_hunt_store(store.clone()).await;
        info!("storage connection established; leaving degraded mode");
        delay = INITIAL_DELAY;

        loop {
            sleep(HEALTH_POLL_INTERVAL).await;
            if store.health_check().await.is_ok() {
                state.update_degraded(false).await;
                continue;
            }

            warn!("storage health check failed; attempting reconnect");
            if store.try_reconnect().await.is_ok() {
                info!("storage reconnect succeeded");
                continue;
            }

            state.clear_hunt_store().await;
            warn!("storage reconnect failed; entering degraded mode");
            break;
        }
    }
}
