//! Document store boundary.
//!
//! Services talk to storage exclusively through [`DocumentStore`]. Backends
//! hold schemaless JSON documents in named collections, keyed by UUID v7, so
//! listings ordered by id come back in creation order. Uniqueness constraints
//! live at the storage level as [`UniqueIndex`] declarations and surface as
//! [`StoreError::Conflict`] when violated.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

pub use gather_common::error::StoreError;

/// A stored document: its key plus the full JSON body.
///
/// The body always carries an `id` field equal to the key, so [`decode`]
/// deserializes straight into model types.
///
/// [`decode`]: Document::decode
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub fields: Value,
}

impl Document {
    /// Deserialize the document body into a typed model.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        serde_json::from_value(self.fields).map_err(StoreError::from)
    }
}

/// A predicate over a document body.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Top-level field equals value.
    Eq { field: String, value: Value },
}

impl Filter {
    /// Equality filter on a top-level field.
    pub fn eq(field: impl Into<String>, value: impl Serialize) -> Self {
        Self::Eq {
            field: field.into(),
            value: serde_json::to_value(value).unwrap_or(Value::Null),
        }
    }

    /// Whether a document body satisfies this filter. Missing fields compare
    /// as JSON null.
    pub fn matches(&self, fields: &Value) -> bool {
        match self {
            Self::Eq { field, value } => fields.get(field).unwrap_or(&Value::Null) == value,
        }
    }
}

/// A storage-level uniqueness constraint over one or more fields, optionally
/// restricted to documents matching a predicate (a partial index).
#[derive(Debug, Clone)]
pub struct UniqueIndex {
    pub collection: String,
    pub fields: Vec<String>,
    pub when: Option<Filter>,
}

impl UniqueIndex {
    pub fn new(collection: &str, fields: &[&str]) -> Self {
        Self {
            collection: collection.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            when: None,
        }
    }

    /// Restrict the index to documents matching `filter`.
    pub fn when(mut self, filter: Filter) -> Self {
        self.when = Some(filter);
        self
    }

    /// Name reported in conflict errors, e.g. `community_members.community_id_user_id`.
    pub fn constraint_name(&self) -> String {
        format!("{}.{}", self.collection, self.fields.join("_"))
    }

    /// Whether a document body participates in this index.
    pub fn applies_to(&self, fields: &Value) -> bool {
        self.when.as_ref().is_none_or(|f| f.matches(fields))
    }

    /// The index key of a document body. `None` when any indexed field is
    /// absent or null; such documents do not participate.
    pub fn key_of(&self, fields: &Value) -> Option<Vec<Value>> {
        self.fields
            .iter()
            .map(|f| match fields.get(f) {
                Some(Value::Null) | None => None,
                Some(v) => Some(v.clone()),
            })
            .collect()
    }
}

/// The storage contract the membership and join request services depend on.
///
/// Reads are point or filtered lookups; writes are whole-document inserts and
/// shallow field patches. Implementations must enforce their declared unique
/// indexes atomically with the write.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List documents matching every filter, ordered by id ascending.
    async fn list(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Document>, StoreError>;

    /// Fetch a single document by id.
    async fn get(&self, collection: &str, id: Uuid) -> Result<Document, StoreError>;

    /// Insert a new document. An `id` field embedded in the body is honored
    /// when it is a valid UUID; otherwise the store assigns one.
    async fn create(&self, collection: &str, fields: Value) -> Result<Document, StoreError>;

    /// Shallow-merge `patch` into an existing document's top-level fields and
    /// return the updated document.
    async fn update(&self, collection: &str, id: Uuid, patch: Value) -> Result<Document, StoreError>;

    /// Remove a document.
    async fn delete(&self, collection: &str, id: Uuid) -> Result<(), StoreError>;
}
