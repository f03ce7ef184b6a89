//! User repository.

use uuid::Uuid;

use gather_common::models::UserProfile;

use crate::collections::USERS;
use crate::store::{DocumentStore, StoreError};

use super::optional;

/// Fetch a user profile by ID.
pub async fn find_by_id(
    store: &dyn DocumentStore,
    id: Uuid,
) -> Result<Option<UserProfile>, StoreError> {
    match optional(store.get(USERS, id).await)? {
        Some(doc) => Ok(Some(doc.decode()?)),
        None => Ok(None),
    }
}
