//! Notification fan-out helper.

use futures_util::future::join_all;

use gather_common::models::Notification;
use gather_db::repository::notifications;
use gather_db::store::DocumentStore;

/// Write a batch of notifications, settling every write regardless of
/// individual failures. One recipient's failure never blocks the others;
/// failures are logged and dropped.
pub(crate) async fn deliver_all(store: &dyn DocumentStore, batch: Vec<Notification>) {
    let writes = batch.iter().map(|n| notifications::create(store, n));
    let outcomes = join_all(writes).await;

    for (notification, outcome) in batch.iter().zip(outcomes) {
        if let Err(e) = outcome {
            tracing::warn!(
                recipient = %notification.user_id,
                kind = ?notification.kind,
                error = %e,
                "Failed to deliver notification"
            );
        }
    }
}
