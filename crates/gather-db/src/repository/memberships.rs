//! Membership repository: per-member records.

use uuid::Uuid;

use gather_common::models::{Membership, MembershipStatus};

use crate::collections::COMMUNITY_MEMBERS;
use crate::store::{DocumentStore, Filter, StoreError};

/// Find a user's active membership record in a community.
pub async fn find_active(
    store: &dyn DocumentStore,
    community_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Membership>, StoreError> {
    let docs = store
        .list(
            COMMUNITY_MEMBERS,
            &[
                Filter::eq("community_id", community_id),
                Filter::eq("user_id", user_id),
                Filter::eq("status", MembershipStatus::Active),
            ],
        )
        .await?;
    docs.into_iter().next().map(|d| d.decode()).transpose()
}

/// Insert a membership record.
pub async fn create(store: &dyn DocumentStore, membership: &Membership) -> Result<(), StoreError> {
    store
        .create(COMMUNITY_MEMBERS, serde_json::to_value(membership)?)
        .await?;
    Ok(())
}

/// Remove a membership record.
pub async fn delete(store: &dyn DocumentStore, id: Uuid) -> Result<(), StoreError> {
    store.delete(COMMUNITY_MEMBERS, id).await
}
