//! Notification repository.

use gather_common::models::Notification;

use crate::collections::NOTIFICATIONS;
use crate::store::{DocumentStore, StoreError};

/// Insert a notification.
pub async fn create(store: &dyn DocumentStore, notification: &Notification) -> Result<(), StoreError> {
    store
        .create(NOTIFICATIONS, serde_json::to_value(notification)?)
        .await?;
    Ok(())
}
