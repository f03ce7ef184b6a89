//! Join request repository.

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use gather_common::models::{JoinRequest, JoinRequestStatus};

use crate::collections::JOIN_REQUESTS;
use crate::store::{DocumentStore, Filter, StoreError};

use super::optional;

/// Insert a join request.
pub async fn create(store: &dyn DocumentStore, request: &JoinRequest) -> Result<(), StoreError> {
    store
        .create(JOIN_REQUESTS, serde_json::to_value(request)?)
        .await?;
    Ok(())
}

/// Fetch a join request by ID.
pub async fn find_by_id(
    store: &dyn DocumentStore,
    id: Uuid,
) -> Result<Option<JoinRequest>, StoreError> {
    match optional(store.get(JOIN_REQUESTS, id).await)? {
        Some(doc) => Ok(Some(doc.decode()?)),
        None => Ok(None),
    }
}

/// Find the pending request for a (community, user) pair, if one exists.
/// The partial unique index guarantees at most one.
pub async fn find_pending(
    store: &dyn DocumentStore,
    community_id: Uuid,
    user_id: Uuid,
) -> Result<Option<JoinRequest>, StoreError> {
    let docs = store
        .list(
            JOIN_REQUESTS,
            &[
                Filter::eq("community_id", community_id),
                Filter::eq("user_id", user_id),
                Filter::eq("status", JoinRequestStatus::Pending),
            ],
        )
        .await?;
    docs.into_iter().next().map(|d| d.decode()).transpose()
}

/// Full request history for a (community, user) pair, oldest first.
pub async fn list_for_pair(
    store: &dyn DocumentStore,
    community_id: Uuid,
    user_id: Uuid,
) -> Result<Vec<JoinRequest>, StoreError> {
    let docs = store
        .list(
            JOIN_REQUESTS,
            &[
                Filter::eq("community_id", community_id),
                Filter::eq("user_id", user_id),
            ],
        )
        .await?;
    docs.into_iter().map(|d| d.decode()).collect()
}

/// All pending requests for a community, oldest first.
pub async fn list_pending(
    store: &dyn DocumentStore,
    community_id: Uuid,
) -> Result<Vec<JoinRequest>, StoreError> {
    let docs = store
        .list(
            JOIN_REQUESTS,
            &[
                Filter::eq("community_id", community_id),
                Filter::eq("status", JoinRequestStatus::Pending),
            ],
        )
        .await?;
    docs.into_iter().map(|d| d.decode()).collect()
}

/// Move a request out of the pending state.
pub async fn mark_resolved(
    store: &dyn DocumentStore,
    id: Uuid,
    status: JoinRequestStatus,
    responded_at: DateTime<Utc>,
    responded_by: Option<Uuid>,
) -> Result<(), StoreError> {
    store
        .update(
            JOIN_REQUESTS,
            id,
            json!({
                "status": status,
                "responded_at": responded_at,
                "responded_by": responded_by,
            }),
        )
        .await?;
    Ok(())
}
