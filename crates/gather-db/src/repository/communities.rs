//! Community repository.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use gather_common::models::Community;

use crate::collections::COMMUNITIES;
use crate::json_compat::encode_member_list;
use crate::store::{DocumentStore, StoreError};

use super::optional;

/// Fetch a community by ID.
pub async fn find_by_id(
    store: &dyn DocumentStore,
    id: Uuid,
) -> Result<Option<Community>, StoreError> {
    match optional(store.get(COMMUNITIES, id).await)? {
        Some(doc) => Ok(Some(doc.decode()?)),
        None => Ok(None),
    }
}

/// Write back the embedded member list in canonical shape, together with the
/// denormalized count.
pub async fn persist_member_list(
    store: &dyn DocumentStore,
    community_id: Uuid,
    members: &[Uuid],
    member_count: i64,
) -> Result<(), StoreError> {
    store
        .update(
            COMMUNITIES,
            community_id,
            json!({
                "members": encode_member_list(members),
                "member_count": member_count,
                "updated_at": Utc::now(),
            }),
        )
        .await?;
    Ok(())
}
