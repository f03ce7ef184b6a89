//! Notification model: in-app messages about join request activity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::id::generate_id;

/// An in-app notification delivered to a single recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,

    /// Recipient user ID
    pub user_id: Uuid,

    pub kind: NotificationKind,

    pub community_id: Uuid,

    /// Community name at the time the notification was created
    pub community_name: String,

    /// Human-readable message body
    pub message: String,

    /// The join request this notification is about, if any
    #[serde(default)]
    pub join_request_id: Option<Uuid>,

    /// Why an approval happened. Only set on `Approved`.
    #[serde(default)]
    pub reason: Option<ApprovalReason>,

    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Notify an admin that someone asked to join their community.
    pub fn join_request(
        recipient: Uuid,
        community_id: Uuid,
        community_name: &str,
        requester_name: &str,
        request_id: Uuid,
    ) -> Self {
        Self {
            id: generate_id(),
            user_id: recipient,
            kind: NotificationKind::JoinRequest,
            community_id,
            community_name: community_name.to_string(),
            message: format!("{requester_name} asked to join {community_name}"),
            join_request_id: Some(request_id),
            reason: None,
            read: false,
            created_at: Utc::now(),
        }
    }

    /// Notify a requester that their request was approved.
    pub fn request_approved(
        recipient: Uuid,
        community_id: Uuid,
        community_name: &str,
        request_id: Uuid,
        reason: ApprovalReason,
    ) -> Self {
        let message = match reason {
            ApprovalReason::AdminApproval => {
                format!("Your request to join {community_name} was approved")
            }
            ApprovalReason::CommunityMadePublic => {
                format!("{community_name} is now public, so your request was approved automatically")
            }
        };
        Self {
            id: generate_id(),
            user_id: recipient,
            kind: NotificationKind::Approved,
            community_id,
            community_name: community_name.to_string(),
            message,
            join_request_id: Some(request_id),
            reason: Some(reason),
            read: false,
            created_at: Utc::now(),
        }
    }

    /// Notify a requester that their request was declined.
    pub fn request_rejected(
        recipient: Uuid,
        community_id: Uuid,
        community_name: &str,
        request_id: Uuid,
    ) -> Self {
        Self {
            id: generate_id(),
            user_id: recipient,
            kind: NotificationKind::Rejected,
            community_id,
            community_name: community_name.to_string(),
            message: format!("Your request to join {community_name} was declined"),
            join_request_id: Some(request_id),
            reason: None,
            read: false,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    JoinRequest,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalReason {
    AdminApproval,
    CommunityMadePublic,
}
