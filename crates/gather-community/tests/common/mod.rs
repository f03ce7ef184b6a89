//! Shared harness for membership and join request integration tests.
//!
//! Seeds an in-memory document store with communities, users, and request
//! history, and provides inspection helpers for the state the services leave
//! behind.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use gather_common::id::generate_id;
use gather_common::models::{
    Community, JoinRequest, JoinRequestStatus, Notification, UserProfile,
};
use gather_community::{JoinRequestService, MembershipService};
use gather_db::MemoryStore;
use gather_db::collections;
use gather_db::store::{Document, DocumentStore, Filter, StoreError};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn store() -> Arc<MemoryStore> {
    init_tracing();
    Arc::new(MemoryStore::with_schema())
}

/// Both services wired over one store and one shared cache.
pub fn services(store: &Arc<MemoryStore>) -> (MembershipService, JoinRequestService) {
    let backend: Arc<dyn DocumentStore> = store.clone();
    let membership = MembershipService::new(backend.clone());
    let requests = JoinRequestService::new(backend, membership.cache());
    (membership, requests)
}

pub async fn seed_user(store: &MemoryStore, display_name: &str) -> Uuid {
    let profile = UserProfile {
        id: generate_id(),
        display_name: display_name.to_string(),
        email: None,
        avatar: None,
    };
    store
        .create(collections::USERS, serde_json::to_value(&profile).expect("encode user"))
        .await
        .expect("seed user");
    profile.id
}

pub async fn seed_community(store: &MemoryStore, creator_id: Uuid, is_private: bool) -> Uuid {
    seed_community_with(store, creator_id, is_private, json!([]), 0, Vec::new()).await
}

/// Seed a community with an arbitrary legacy member list shape.
pub async fn seed_community_with(
    store: &MemoryStore,
    creator_id: Uuid,
    is_private: bool,
    members: Value,
    member_count: i64,
    admins: Vec<Uuid>,
) -> Uuid {
    let now = Utc::now();
    let community = Community {
        id: generate_id(),
        name: "Trail Runners".to_string(),
        description: Some("Weekend trail runs around the city".to_string()),
        creator_id,
        admins,
        is_private,
        members,
        member_count,
        created_at: now,
        updated_at: now,
    };
    store
        .create(
            collections::COMMUNITIES,
            serde_json::to_value(&community).expect("encode community"),
        )
        .await
        .expect("seed community");
    community.id
}

/// Seed a resolved rejection so cooldown checks have history to look at.
pub async fn seed_rejected_request(
    store: &MemoryStore,
    community_id: Uuid,
    user_id: Uuid,
    responded_at: DateTime<Utc>,
) {
    let mut request = JoinRequest::new(community_id, user_id);
    request.status = JoinRequestStatus::Rejected;
    request.requested_at = responded_at - chrono::Duration::minutes(5);
    request.responded_at = Some(responded_at);
    request.responded_by = Some(generate_id());
    store
        .create(
            collections::JOIN_REQUESTS,
            serde_json::to_value(&request).expect("encode request"),
        )
        .await
        .expect("seed rejected request");
}

pub async fn community(store: &MemoryStore, community_id: Uuid) -> Community {
    store
        .get(collections::COMMUNITIES, community_id)
        .await
        .expect("community document")
        .decode()
        .expect("decode community")
}

pub async fn membership_records(store: &MemoryStore, community_id: Uuid, user_id: Uuid) -> usize {
    store
        .list(
            collections::COMMUNITY_MEMBERS,
            &[
                Filter::eq("community_id", community_id),
                Filter::eq("user_id", user_id),
            ],
        )
        .await
        .expect("list membership records")
        .len()
}

pub async fn notifications_for(store: &MemoryStore, user_id: Uuid) -> Vec<Notification> {
    store
        .list(collections::NOTIFICATIONS, &[Filter::eq("user_id", user_id)])
        .await
        .expect("list notifications")
        .into_iter()
        .map(|doc| doc.decode().expect("decode notification"))
        .collect()
}

/// A store whose every operation fails, for exercising degraded paths.
pub struct FailingStore;

impl FailingStore {
    fn offline() -> StoreError {
        StoreError::Backend {
            message: "storage offline".to_string(),
        }
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn list(
        &self,
        _collection: &str,
        _filters: &[Filter],
    ) -> Result<Vec<Document>, StoreError> {
        Err(Self::offline())
    }

    async fn get(&self, _collection: &str, _id: Uuid) -> Result<Document, StoreError> {
        Err(Self::offline())
    }

    async fn create(&self, _collection: &str, _fields: Value) -> Result<Document, StoreError> {
        Err(Self::offline())
    }

    async fn update(
        &self,
        _collection: &str,
        _id: Uuid,
        _patch: Value,
    ) -> Result<Document, StoreError> {
        Err(Self::offline())
    }

    async fn delete(&self, _collection: &str, _id: Uuid) -> Result<(), StoreError> {
        Err(Self::offline())
    }
}

/// Services wired over a store that always fails.
pub fn failing_services() -> (MembershipService, JoinRequestService) {
    init_tracing();
    let backend: Arc<dyn DocumentStore> = Arc::new(FailingStore);
    let membership = MembershipService::new(backend.clone());
    let requests = JoinRequestService::new(backend, membership.cache());
    (membership, requests)
}

/// A store that persists everything except notifications, whose writes fail.
/// Exercises the best-effort delivery contract.
pub struct NotificationOutageStore {
    inner: Arc<MemoryStore>,
}

impl NotificationOutageStore {
    fn sink_offline() -> StoreError {
        StoreError::Backend {
            message: "notification sink offline".to_string(),
        }
    }
}

#[async_trait]
impl DocumentStore for NotificationOutageStore {
    async fn list(
        &self,
        collection: &str,
        filters: &[Filter],
    ) -> Result<Vec<Document>, StoreError> {
        self.inner.list(collection, filters).await
    }

    async fn get(&self, collection: &str, id: Uuid) -> Result<Document, StoreError> {
        self.inner.get(collection, id).await
    }

    async fn create(&self, collection: &str, fields: Value) -> Result<Document, StoreError> {
        if collection == collections::NOTIFICATIONS {
            return Err(Self::sink_offline());
        }
        self.inner.create(collection, fields).await
    }

    async fn update(&self, collection: &str, id: Uuid, patch: Value) -> Result<Document, StoreError> {
        self.inner.update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<(), StoreError> {
        self.inner.delete(collection, id).await
    }
}

/// Services wired over `store` with the notification sink down.
pub fn notification_outage_services(
    store: &Arc<MemoryStore>,
) -> (MembershipService, JoinRequestService) {
    let backend: Arc<dyn DocumentStore> = Arc::new(NotificationOutageStore {
        inner: store.clone(),
    });
    let membership = MembershipService::new(backend.clone());
    let requests = JoinRequestService::new(backend, membership.cache());
    (membership, requests)
}
