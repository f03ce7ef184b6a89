//! In-memory document store.
//!
//! Backs tests and single-node deployments. Collections are `BTreeMap`s keyed
//! by UUID v7, which keeps documents in creation order without a separate
//! sort. Unique indexes are enforced inside the write lock, so conflicting
//! writers observe the same outcome a real backend would give them.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use gather_common::id::generate_id;

use crate::collections;
use crate::store::{Document, DocumentStore, Filter, StoreError, UniqueIndex};

type Collections = HashMap<String, BTreeMap<Uuid, Value>>;

pub struct MemoryStore {
    collections: RwLock<Collections>,
    indexes: Vec<UniqueIndex>,
}

impl MemoryStore {
    /// An empty store with no uniqueness constraints.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            indexes: Vec::new(),
        }
    }

    /// An empty store enforcing the standard schema's unique indexes.
    pub fn with_schema() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            indexes: collections::unique_indexes(),
        }
    }

    /// Reject a write that would collide with another document under any
    /// unique index. Runs inside the write lock.
    fn check_indexes(
        &self,
        all: &Collections,
        collection: &str,
        candidate: &Value,
        exclude_id: Uuid,
    ) -> Result<(), StoreError> {
        for index in self.indexes.iter().filter(|i| i.collection == collection) {
            if !index.applies_to(candidate) {
                continue;
            }
            let Some(key) = index.key_of(candidate) else {
                continue;
            };
            let Some(docs) = all.get(collection) else {
                continue;
            };
            let taken = docs.iter().any(|(id, fields)| {
                *id != exclude_id
                    && index.applies_to(fields)
                    && index.key_of(fields).as_ref() == Some(&key)
            });
            if taken {
                return Err(StoreError::Conflict {
                    collection: collection.to_string(),
                    constraint: index.constraint_name(),
                });
            }
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn require_object(fields: &Value) -> Result<(), StoreError> {
    if fields.is_object() {
        Ok(())
    } else {
        Err(StoreError::InvalidDocument {
            message: "document body must be a JSON object".to_string(),
        })
    }
}

/// Take the embedded `id` if it parses as a UUID, otherwise assign a new one.
fn resolve_id(fields: &Value) -> Uuid {
    fields
        .get("id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(generate_id)
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Document>, StoreError> {
        let all = self.collections.read().unwrap();
        let Some(docs) = all.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(docs
            .iter()
            .filter(|(_, fields)| filters.iter().all(|f| f.matches(fields)))
            .map(|(id, fields)| Document {
                id: *id,
                fields: fields.clone(),
            })
            .collect())
    }

    async fn get(&self, collection: &str, id: Uuid) -> Result<Document, StoreError> {
        let all = self.collections.read().unwrap();
        all.get(collection)
            .and_then(|docs| docs.get(&id))
            .map(|fields| Document {
                id,
                fields: fields.clone(),
            })
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id,
            })
    }

    async fn create(&self, collection: &str, fields: Value) -> Result<Document, StoreError> {
        require_object(&fields)?;
        let mut fields = fields;
        let id = resolve_id(&fields);
        fields["id"] = Value::String(id.to_string());

        let mut all = self.collections.write().unwrap();
        if all.get(collection).is_some_and(|docs| docs.contains_key(&id)) {
            return Err(StoreError::Conflict {
                collection: collection.to_string(),
                constraint: format!("{collection}.id"),
            });
        }
        self.check_indexes(&all, collection, &fields, id)?;

        all.entry(collection.to_string())
            .or_default()
            .insert(id, fields.clone());
        Ok(Document { id, fields })
    }

    async fn update(&self, collection: &str, id: Uuid, patch: Value) -> Result<Document, StoreError> {
        require_object(&patch)?;

        let mut all = self.collections.write().unwrap();
        let current = all
            .get(collection)
            .and_then(|docs| docs.get(&id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id,
            })?;

        let mut merged = current;
        if let (Some(target), Some(changes)) = (merged.as_object_mut(), patch.as_object()) {
            for (key, value) in changes {
                target.insert(key.clone(), value.clone());
            }
        }
        // The key is immutable; a patched `id` field is discarded.
        merged["id"] = Value::String(id.to_string());

        self.check_indexes(&all, collection, &merged, id)?;

        if let Some(docs) = all.get_mut(collection) {
            docs.insert(id, merged.clone());
        }
        Ok(Document { id, fields: merged })
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<(), StoreError> {
        let mut all = self.collections.write().unwrap();
        let removed = all.get_mut(collection).and_then(|docs| docs.remove(&id));
        if removed.is_none() {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id,
            });
        }
        Ok(())
    }
}
