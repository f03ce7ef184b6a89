//! Membership service.
//!
//! The authority for "is user U an active member of community C". Membership
//! lives in two places: the per-member records in `community_members` and a
//! legacy embedded list on the community document. Reads consult both and
//! lazily repair a missing record when the legacy list disagrees; the public
//! join and leave paths keep the two in lockstep by construction.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use gather_common::config::MembershipSettings;
use gather_common::error::{GatherError, GatherResult};
use gather_common::models::{MemberRole, Membership};
use gather_db::json_compat::decode_member_list;
use gather_db::repository::{communities, memberships};
use gather_db::store::DocumentStore;

use crate::cache::MembershipCache;

/// How a join call concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinState {
    Joined,
    AlreadyMember,
}

/// Summary handed back to callers of [`MembershipService::join_community`].
#[derive(Debug, Clone, Copy, Serialize)]
pub struct JoinOutcome {
    pub success: bool,
    pub status: JoinState,
}

pub struct MembershipService {
    store: Arc<dyn DocumentStore>,
    cache: MembershipCache,
}

impl MembershipService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_settings(store, &MembershipSettings::default())
    }

    pub fn with_settings(store: Arc<dyn DocumentStore>, settings: &MembershipSettings) -> Self {
        Self {
            store,
            cache: MembershipCache::new(Duration::from_secs(settings.cache_ttl_secs)),
        }
    }

    /// A handle to the membership cache, for sharing with the join request
    /// service so approvals invalidate the same entries.
    pub fn cache(&self) -> MembershipCache {
        self.cache.clone()
    }

    /// Whether the user is an active member of the community.
    ///
    /// Answers from the cache when fresh. On a miss, checks the membership
    /// record first and falls back to the legacy embedded list, repairing the
    /// missing record when the list disagrees. Storage failures degrade to
    /// `false`; a user is never shown as a member when membership cannot be
    /// confirmed.
    pub async fn check_membership(&self, community_id: Uuid, user_id: Uuid) -> bool {
        if let Some(member) = self.cache.get(community_id, user_id) {
            return member;
        }

        match self.lookup_membership(community_id, user_id).await {
            Ok(member) => {
                self.cache.insert(community_id, user_id, member);
                member
            }
            Err(e) => {
                tracing::error!(
                    community_id = %community_id,
                    user_id = %user_id,
                    error = %e,
                    "Membership check failed, treating user as non-member"
                );
                false
            }
        }
    }

    async fn lookup_membership(&self, community_id: Uuid, user_id: Uuid) -> GatherResult<bool> {
        if memberships::find_active(&*self.store, community_id, user_id)
            .await?
            .is_some()
        {
            return Ok(true);
        }

        // Fall back to the legacy embedded list
        let Some(community) = communities::find_by_id(&*self.store, community_id).await? else {
            return Ok(false);
        };
        if decode_member_list(&community.members).contains(&user_id) {
            self.ensure_membership_record(community_id, user_id).await;
            return Ok(true);
        }

        Ok(false)
    }

    /// Create the membership record the legacy list says should exist.
    /// Best-effort: a conflict means another caller repaired it first; any
    /// other failure is logged and swallowed.
    async fn ensure_membership_record(&self, community_id: Uuid, user_id: Uuid) {
        let membership = Membership::new(community_id, user_id, MemberRole::Member);
        match memberships::create(&*self.store, &membership).await {
            Ok(()) => {
                tracing::info!(
                    community_id = %community_id,
                    user_id = %user_id,
                    "Repaired missing membership record from legacy member list"
                );
            }
            Err(e) if e.is_conflict() => {
                tracing::debug!(
                    community_id = %community_id,
                    user_id = %user_id,
                    "Membership record already present"
                );
            }
            Err(e) => {
                tracing::warn!(
                    community_id = %community_id,
                    user_id = %user_id,
                    error = %e,
                    "Failed to repair membership record"
                );
            }
        }
    }

    /// Join a public community.
    ///
    /// Private communities are refused here; they go through the join request
    /// flow. Idempotent: joining twice leaves one membership record and an
    /// unchanged member count. The cache entry for the pair is invalidated on
    /// every outcome, including errors.
    pub async fn join_community(
        &self,
        community_id: Uuid,
        user_id: Uuid,
    ) -> GatherResult<JoinOutcome> {
        let result = self.join_public(community_id, user_id).await;
        self.cache.invalidate(community_id, user_id);
        let status = result?;
        Ok(JoinOutcome {
            success: true,
            status,
        })
    }

    async fn join_public(&self, community_id: Uuid, user_id: Uuid) -> GatherResult<JoinState> {
        let community = communities::find_by_id(&*self.store, community_id)
            .await?
            .ok_or(GatherError::NotFound {
                resource: "Community".into(),
            })?;

        if community.is_private {
            return Err(GatherError::PrivateCommunity);
        }

        if memberships::find_active(&*self.store, community_id, user_id)
            .await?
            .is_some()
        {
            return Ok(JoinState::AlreadyMember);
        }

        let mut members = decode_member_list(&community.members);
        if members.contains(&user_id) {
            // Present in the legacy list only; converge on the record
            self.ensure_membership_record(community_id, user_id).await;
            return Ok(JoinState::AlreadyMember);
        }

        let membership = Membership::new(community_id, user_id, MemberRole::Member);
        if let Err(e) = memberships::create(&*self.store, &membership).await {
            if e.is_conflict() {
                // A concurrent join won the insert
                return Ok(JoinState::AlreadyMember);
            }
            return Err(e.into());
        }

        members.push(user_id);
        communities::persist_member_list(
            &*self.store,
            community_id,
            &members,
            community.member_count + 1,
        )
        .await?;

        tracing::info!(
            community_id = %community_id,
            user_id = %user_id,
            "User joined community"
        );
        Ok(JoinState::Joined)
    }

    /// Remove the user from both membership representations.
    ///
    /// Safe to call on a non-member; that is a no-op, not an error. The cache
    /// entry for the pair is invalidated on every outcome.
    pub async fn leave_community(&self, community_id: Uuid, user_id: Uuid) -> GatherResult<()> {
        let result = self.remove_member(community_id, user_id).await;
        self.cache.invalidate(community_id, user_id);
        result
    }

    async fn remove_member(&self, community_id: Uuid, user_id: Uuid) -> GatherResult<()> {
        let mut removed = false;

        if let Some(membership) =
            memberships::find_active(&*self.store, community_id, user_id).await?
        {
            memberships::delete(&*self.store, membership.id).await?;
            removed = true;
        }

        if let Some(community) = communities::find_by_id(&*self.store, community_id).await? {
            let mut members = decode_member_list(&community.members);
            let before = members.len();
            members.retain(|m| *m != user_id);
            if members.len() != before {
                // List and count move together; an untouched list leaves the
                // count alone
                let member_count = (community.member_count - 1).max(0);
                communities::persist_member_list(
                    &*self.store,
                    community_id,
                    &members,
                    member_count,
                )
                .await?;
                removed = true;
            }
        }

        if removed {
            tracing::info!(
                community_id = %community_id,
                user_id = %user_id,
                "User left community"
            );
        }
        Ok(())
    }

    /// Whether the user is the community's creator or listed as an admin.
    ///
    /// Not served from the membership cache; every call reads storage.
    /// Storage failures degrade to `false`.
    pub async fn is_user_community_admin(&self, community_id: Uuid, user_id: Uuid) -> bool {
        match communities::find_by_id(&*self.store, community_id).await {
            Ok(Some(community)) => {
                community.creator_id == user_id || community.admins.contains(&user_id)
            }
            Ok(None) => false,
            Err(e) => {
                tracing::error!(
                    community_id = %community_id,
                    user_id = %user_id,
                    error = %e,
                    "Admin check failed, treating user as non-admin"
                );
                false
            }
        }
    }

    /// Drop the cached answer for one pair.
    pub fn invalidate_cache(&self, community_id: Uuid, user_id: Uuid) {
        self.cache.invalidate(community_id, user_id);
    }

    /// Drop every cached answer. Used after bulk admin operations.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
