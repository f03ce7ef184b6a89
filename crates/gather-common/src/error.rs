//! Centralized error types for Gather.
//!
//! Uses `thiserror` for ergonomic error definitions. Storage-boundary failures
//! get their own type so repositories can report conflicts and missing
//! documents without dragging service-level concerns into the store layer.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::JoinRequestStatus;

/// Core application error type used across all Gather services.
#[derive(Debug, thiserror::Error)]
pub enum GatherError {
    // === Resource errors ===
    #[error("{resource} not found")]
    NotFound { resource: String },

    // === Membership errors ===
    #[error("Community is private; membership requires an approved join request")]
    PrivateCommunity,

    // === Join request errors ===
    #[error("A join request for this community is already pending")]
    RequestAlreadyPending,

    #[error("Join request rejected recently. Retry after {retry_at}")]
    RequestCooldown { retry_at: DateTime<Utc> },

    #[error("No pending join request to cancel")]
    NoPendingRequest,

    #[error("Join request was already resolved as {status}")]
    RequestAlreadyResolved { status: JoinRequestStatus },

    // === Infrastructure errors ===
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl GatherError {
    /// Error code string for programmatic handling by clients.
    pub fn error_code(&self) -> &str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::PrivateCommunity => "PRIVATE_COMMUNITY",
            Self::RequestAlreadyPending => "REQUEST_ALREADY_PENDING",
            Self::RequestCooldown { .. } => "REQUEST_COOLDOWN",
            Self::NoPendingRequest => "NO_PENDING_REQUEST",
            Self::RequestAlreadyResolved { .. } => "REQUEST_ALREADY_RESOLVED",
            Self::Store(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Convenience type alias for Results using GatherError.
pub type GatherResult<T> = Result<T, GatherError>;

/// Errors surfaced by the document store boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document {id} not found in {collection}")]
    NotFound { collection: String, id: Uuid },

    #[error("Unique constraint {constraint} violated in {collection}")]
    Conflict { collection: String, constraint: String },

    #[error("Invalid document: {message}")]
    InvalidDocument { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage backend error: {message}")]
    Backend { message: String },
}

impl StoreError {
    /// True when the error is a unique-constraint conflict. Callers racing on
    /// insert treat this as "someone else won".
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
