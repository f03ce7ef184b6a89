//! Collection names and schema declarations.

use crate::store::{Filter, UniqueIndex};

pub const COMMUNITIES: &str = "communities";
pub const COMMUNITY_MEMBERS: &str = "community_members";
pub const JOIN_REQUESTS: &str = "join_requests";
pub const NOTIFICATIONS: &str = "notifications";
pub const USERS: &str = "users";

/// Unique indexes every backend must enforce.
///
/// Membership is unique per (community, user). Join requests allow a full
/// history of resolved requests but at most one pending row per pair, hence
/// the partial index.
pub fn unique_indexes() -> Vec<UniqueIndex> {
    vec![
        UniqueIndex::new(COMMUNITY_MEMBERS, &["community_id", "user_id"]),
        UniqueIndex::new(JOIN_REQUESTS, &["community_id", "user_id"])
            .when(Filter::eq("status", "pending")),
    ]
}
