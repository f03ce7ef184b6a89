//! Community model: the membership container.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A Gather community.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Community {
    pub id: Uuid,

    /// Community name
    pub name: String,

    /// Community description
    #[serde(default)]
    pub description: Option<String>,

    /// Creator user ID. The creator is always treated as an admin.
    pub creator_id: Uuid,

    /// Additional admin user IDs
    #[serde(default)]
    pub admins: Vec<Uuid>,

    /// Private communities require an approved join request to enter
    #[serde(default)]
    pub is_private: bool,

    /// Legacy embedded member list. Older documents stored membership here
    /// before per-member records existed; some hold a JSON array of IDs,
    /// some a stringified array, some garbage. Kept raw and parsed
    /// defensively at the point of use.
    #[serde(default)]
    pub members: serde_json::Value,

    /// Member count (denormalized for display)
    #[serde(default)]
    pub member_count: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
