//! Join request model: a user's request to enter a private community.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::id::generate_id;

/// A request to join a private community.
///
/// At most one request per (community, user) pair may be pending at a time.
/// Resolved requests are kept as history; cooldown checks look at the most
/// recent rejections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    pub id: Uuid,
    pub community_id: Uuid,
    pub user_id: Uuid,

    pub status: JoinRequestStatus,

    pub requested_at: DateTime<Utc>,

    /// When the request left the pending state
    #[serde(default)]
    pub responded_at: Option<DateTime<Utc>>,

    /// The admin who resolved the request. `None` for cancellations and
    /// automatic approvals.
    #[serde(default)]
    pub responded_by: Option<Uuid>,
}

impl JoinRequest {
    /// Build a fresh pending request.
    pub fn new(community_id: Uuid, user_id: Uuid) -> Self {
        Self {
            id: generate_id(),
            community_id,
            user_id,
            status: JoinRequestStatus::Pending,
            requested_at: Utc::now(),
            responded_at: None,
            responded_by: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == JoinRequestStatus::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinRequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl JoinRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for JoinRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The decision an admin takes on a pending join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinRequestAction {
    Approved,
    Rejected,
}

impl JoinRequestAction {
    /// The terminal status this action resolves a request to.
    pub fn status(&self) -> JoinRequestStatus {
        match self {
            Self::Approved => JoinRequestStatus::Approved,
            Self::Rejected => JoinRequestStatus::Rejected,
        }
    }
}
