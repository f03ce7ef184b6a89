//! User profile model: the slice of a user the membership flows care about.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user profile as stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,

    /// Display name shown in notifications and request listings
    pub display_name: String,

    #[serde(default)]
    pub email: Option<String>,

    /// Avatar image key
    #[serde(default)]
    pub avatar: Option<String>,
}
