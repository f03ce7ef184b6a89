//! Membership model: a user's membership record in a specific community.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::id::generate_id;

/// Represents a user's membership in a community.
///
/// This is the authoritative per-member record. Communities also carry a
/// legacy embedded member list; readers consult both and converge on this
/// representation over time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub id: Uuid,
    pub community_id: Uuid,
    pub user_id: Uuid,

    /// Role within the community
    pub role: MemberRole,

    /// Lifecycle status. Everything the join flow creates is `Active`;
    /// the other states exist for records imported from older systems.
    pub status: MembershipStatus,

    /// When the user joined this community
    pub joined_at: DateTime<Utc>,

    /// Who invited the user, if anyone
    #[serde(default)]
    pub invited_by: Option<Uuid>,

    /// Last time the member was seen active in the community
    #[serde(default)]
    pub last_active_at: Option<DateTime<Utc>>,

    /// Whether the member receives community notifications
    #[serde(default = "default_notifications")]
    pub notifications: bool,
}

fn default_notifications() -> bool {
    true
}

impl Membership {
    /// Build a fresh active membership record.
    pub fn new(community_id: Uuid, user_id: Uuid, role: MemberRole) -> Self {
        Self {
            id: generate_id(),
            community_id,
            user_id,
            role,
            status: MembershipStatus::Active,
            joined_at: Utc::now(),
            invited_by: None,
            last_active_at: None,
            notifications: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Owner,
    Admin,
    Member,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    Active,
    Pending,
    Rejected,
}
