//! Thin catalog ingestion surface.
//!
//! Registers hunts with their ordered treasures so ordinals are guaranteed
//! contiguous 1..N at the only place hunts enter the system. Richer catalog
//! maintenance (editing, re-ordering, deletion) is out of scope.

use std::collections::HashSet;
use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::{HuntEntity, TreasureEntity},
    dto::hunt::{CreateHuntRequest, HuntListItem, HuntSummary},
    error::ServiceError,
    state::SharedState,
};

/// Register a hunt with its treasures in one shot.
pub async fn create_hunt(
    state: &SharedState,
    request: CreateHuntRequest,
) -> Result<HuntSummary, ServiceError> {
    let store = state.require_hunt_store().await?;

    let mut seen_tokens = HashSet::new();
    let treasures = request
        .treasures
        .into_iter()
        .enumerate()
        .map(|(index, input)| {
            let scan_token = match input.scan_token {
                Some(token) => {
                    let token = token.trim().to_owned();
                    if token.is_empty() {
                        return Err(ServiceError::InvalidInput(
                            "explicit scan token must not be blank".into(),
                        ));
                    }
                    token
                }
                None => Uuid::new_v4().simple().to_string(),
            };

            if !seen_tokens.insert(scan_token.clone()) {
                return Err(ServiceError::InvalidInput(format!(
                    "duplicate scan token `{scan_token}` in request"
                )));
            }

            Ok(TreasureEntity {
                id: Uuid::new_v4(),
                ordinal: (index as u32) + 1,
                scan_token,
                clue_text: input.clue_text,
            })
        })
        .collect::<Result<Vec<_>, ServiceError>>()?;

    let hunt = HuntEntity {
        id: Uuid::new_v4(),
        title: request.title,
        created_at: SystemTime::now(),
        treasures,
    };

    store.save_hunt(hunt.clone()).await?;
    info!(hunt_id = %hunt.id, treasures = hunt.treasures.len(), "hunt registered");
    Ok(hunt.into())
}

/// Fetch a hunt with its treasures.
pub async fn get_hunt(state: &SharedState, hunt_id: Uuid) -> Result<HuntSummary, ServiceError> {
    let store = state.require_hunt_store().await?;
    let Some(hunt) = store.find_hunt(hunt_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "hunt `{hunt_id}` not found"
        )));
    };
    Ok(hunt.into())
}

/// List registered hunts without their treasure payloads.
pub async fn list_hunts(state: &SharedState) -> Result<Vec<HuntListItem>, ServiceError> {
    let store = state.require_hunt_store().await?;
    let hunts = store.list_hunts().await?;
    Ok(hunts.into_iter().map(Into::into).collect())
}
