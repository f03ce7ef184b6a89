//! Join request service.
//!
//! Runs the lifecycle of private-community join requests. A request moves
//! from pending to exactly one of approved, rejected, or cancelled and never
//! changes again; a fresh attempt is a fresh request. At most one pending
//! request exists per (community, user) pair, enforced by a partial unique
//! index at the storage layer, and a rejection starts a cooldown before the
//! pair may submit again.
//!
//! Approval is the one place this service touches membership state: it
//! appends the requester to the community's legacy member list and creates
//! the membership record, keeping both representations in lockstep.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use uuid::Uuid;

use gather_common::config::JoinRequestSettings;
use gather_common::error::{GatherError, GatherResult};
use gather_common::models::{
    ApprovalReason, Community, JoinRequest, JoinRequestAction, JoinRequestStatus, MemberRole,
    Membership, Notification, UserProfile,
};
use gather_db::json_compat::decode_member_list;
use gather_db::repository::{communities, join_requests, memberships, users};
use gather_db::store::DocumentStore;

use crate::cache::MembershipCache;
use crate::notify;

/// A pending request joined with its requester's profile, when loadable.
#[derive(Debug, Clone, Serialize)]
pub struct PendingJoinRequest {
    pub request: JoinRequest,
    pub requester: Option<UserProfile>,
}

/// Summary handed back to callers of
/// [`JoinRequestService::respond_to_join_request`].
#[derive(Debug, Clone, Serialize)]
pub struct JoinDecision {
    pub success: bool,
    pub action: JoinRequestAction,
    pub community_name: String,
    pub user_name: String,
}

pub struct JoinRequestService {
    store: Arc<dyn DocumentStore>,
    cache: MembershipCache,
    cooldown: Duration,
}

impl JoinRequestService {
    /// Build the service sharing the membership service's cache handle, so
    /// approvals invalidate the answers members actually see.
    pub fn new(store: Arc<dyn DocumentStore>, cache: MembershipCache) -> Self {
        Self::with_settings(store, cache, &JoinRequestSettings::default())
    }

    pub fn with_settings(
        store: Arc<dyn DocumentStore>,
        cache: MembershipCache,
        settings: &JoinRequestSettings,
    ) -> Self {
        Self {
            store,
            cache,
            cooldown: Duration::hours(settings.cooldown_hours),
        }
    }

    /// Submit a join request for a private community.
    ///
    /// Refused while another request for the pair is pending, and while the
    /// cooldown from the most recent rejection is running. On success the
    /// community's admins are notified best-effort; the request itself is
    /// already committed by then.
    pub async fn submit_join_request(
        &self,
        community_id: Uuid,
        user_id: Uuid,
    ) -> GatherResult<JoinRequest> {
        let history = join_requests::list_for_pair(&*self.store, community_id, user_id).await?;

        if history.iter().any(JoinRequest::is_pending) {
            return Err(GatherError::RequestAlreadyPending);
        }
        if let Some(retry_at) = self.cooldown_until(&history) {
            if retry_at > Utc::now() {
                return Err(GatherError::RequestCooldown { retry_at });
            }
        }

        let request = JoinRequest::new(community_id, user_id);
        if let Err(e) = join_requests::create(&*self.store, &request).await {
            if e.is_conflict() {
                // A concurrent submit won the insert
                return Err(GatherError::RequestAlreadyPending);
            }
            return Err(e.into());
        }

        tracing::info!(
            community_id = %community_id,
            user_id = %user_id,
            request_id = %request.id,
            "Join request submitted"
        );

        self.notify_admins(&request).await;
        Ok(request)
    }

    /// When the pair may submit again, based on the most recent rejection.
    fn cooldown_until(&self, history: &[JoinRequest]) -> Option<DateTime<Utc>> {
        history
            .iter()
            .filter(|r| r.status == JoinRequestStatus::Rejected)
            .filter_map(|r| r.responded_at)
            .max()
            .map(|rejected_at| rejected_at + self.cooldown)
    }

    /// Tell every unique admin (creator first) about a new request.
    /// Best-effort from start to finish: the request is already committed,
    /// so lookup failures skip the fan-out rather than surfacing.
    async fn notify_admins(&self, request: &JoinRequest) {
        let community = match communities::find_by_id(&*self.store, request.community_id).await {
            Ok(Some(community)) => community,
            Ok(None) => {
                tracing::warn!(
                    community_id = %request.community_id,
                    "Community not found, skipping admin notifications"
                );
                return;
            }
            Err(e) => {
                tracing::warn!(
                    community_id = %request.community_id,
                    error = %e,
                    "Could not load community, skipping admin notifications"
                );
                return;
            }
        };

        let requester_name = self.requester_name(request.user_id).await;

        let mut recipients = vec![community.creator_id];
        for admin in &community.admins {
            if !recipients.contains(admin) {
                recipients.push(*admin);
            }
        }

        let batch: Vec<Notification> = recipients
            .into_iter()
            .map(|recipient| {
                Notification::join_request(
                    recipient,
                    community.id,
                    &community.name,
                    &requester_name,
                    request.id,
                )
            })
            .collect();
        notify::deliver_all(&*self.store, batch).await;
    }

    /// Cancel the pair's pending request.
    ///
    /// Requires one to exist; cancelling nothing is an error, unlike leaving
    /// a community.
    pub async fn cancel_join_request(
        &self,
        community_id: Uuid,
        user_id: Uuid,
    ) -> GatherResult<bool> {
        let pending = join_requests::find_pending(&*self.store, community_id, user_id)
            .await?
            .ok_or(GatherError::NoPendingRequest)?;

        join_requests::mark_resolved(
            &*self.store,
            pending.id,
            JoinRequestStatus::Cancelled,
            Utc::now(),
            None,
        )
        .await?;

        tracing::info!(
            community_id = %community_id,
            user_id = %user_id,
            request_id = %pending.id,
            "Join request cancelled"
        );
        Ok(true)
    }

    /// Resolve a pending request as approved or rejected.
    ///
    /// Approval grants membership in both storage representations before the
    /// request flips status; the three writes are independent, so a crash in
    /// between leaves partial state for the next read to repair. A request
    /// that already left the pending state is refused, which makes a double
    /// invocation an error instead of a double-append.
    pub async fn respond_to_join_request(
        &self,
        request_id: Uuid,
        action: JoinRequestAction,
        admin_id: Uuid,
    ) -> GatherResult<JoinDecision> {
        let request = join_requests::find_by_id(&*self.store, request_id)
            .await?
            .ok_or(GatherError::NotFound {
                resource: "Join request".into(),
            })?;
        if !request.is_pending() {
            return Err(GatherError::RequestAlreadyResolved {
                status: request.status,
            });
        }

        let community = communities::find_by_id(&*self.store, request.community_id)
            .await?
            .ok_or(GatherError::NotFound {
                resource: "Community".into(),
            })?;
        let user_name = self.requester_name(request.user_id).await;

        if action == JoinRequestAction::Approved {
            self.grant_membership(&community, &request).await?;
        }

        join_requests::mark_resolved(
            &*self.store,
            request.id,
            action.status(),
            Utc::now(),
            Some(admin_id),
        )
        .await?;

        let notification = match action {
            JoinRequestAction::Approved => Notification::request_approved(
                request.user_id,
                community.id,
                &community.name,
                request.id,
                ApprovalReason::AdminApproval,
            ),
            JoinRequestAction::Rejected => Notification::request_rejected(
                request.user_id,
                community.id,
                &community.name,
                request.id,
            ),
        };
        notify::deliver_all(&*self.store, vec![notification]).await;

        if action == JoinRequestAction::Approved {
            self.cache.invalidate(request.community_id, request.user_id);
        }

        tracing::info!(
            request_id = %request.id,
            community_id = %request.community_id,
            user_id = %request.user_id,
            admin_id = %admin_id,
            action = ?action,
            "Join request resolved"
        );

        Ok(JoinDecision {
            success: true,
            action,
            community_name: community.name,
            user_name,
        })
    }

    /// Put the requester into both membership representations.
    ///
    /// The legacy list append is skipped when the user is already present,
    /// which also leaves the member count untouched. The record insert is
    /// skipped when an active record exists, and a conflict from a racing
    /// writer counts as done.
    async fn grant_membership(
        &self,
        community: &Community,
        request: &JoinRequest,
    ) -> GatherResult<()> {
        let mut members = decode_member_list(&community.members);
        if !members.contains(&request.user_id) {
            members.push(request.user_id);
            communities::persist_member_list(
                &*self.store,
                community.id,
                &members,
                community.member_count + 1,
            )
            .await?;
        }

        if memberships::find_active(&*self.store, community.id, request.user_id)
            .await?
            .is_none()
        {
            let membership = Membership::new(community.id, request.user_id, MemberRole::Member);
            if let Err(e) = memberships::create(&*self.store, &membership).await {
                if e.is_conflict() {
                    tracing::debug!(
                        community_id = %community.id,
                        user_id = %request.user_id,
                        "Membership record already present"
                    );
                } else {
                    return Err(e.into());
                }
            }
        }
        Ok(())
    }

    /// All pending requests for a community with requester profiles joined
    /// best-effort. A profile failure degrades that entry to no profile, and
    /// a failure listing the requests degrades to an empty listing; render
    /// paths never see an error from here.
    pub async fn get_pending_join_requests(&self, community_id: Uuid) -> Vec<PendingJoinRequest> {
        let requests = match join_requests::list_pending(&*self.store, community_id).await {
            Ok(requests) => requests,
            Err(e) => {
                tracing::error!(
                    community_id = %community_id,
                    error = %e,
                    "Failed to list pending join requests"
                );
                return Vec::new();
            }
        };
        self.join_requester_profiles(requests).await
    }

    async fn join_requester_profiles(
        &self,
        requests: Vec<JoinRequest>,
    ) -> Vec<PendingJoinRequest> {
        let lookups = requests
            .iter()
            .map(|r| users::find_by_id(&*self.store, r.user_id));
        let profiles = join_all(lookups).await;

        requests
            .into_iter()
            .zip(profiles)
            .map(|(request, profile)| {
                let requester = match profile {
                    Ok(requester) => requester,
                    Err(e) => {
                        tracing::warn!(
                            user_id = %request.user_id,
                            error = %e,
                            "Could not load requester profile"
                        );
                        None
                    }
                };
                PendingJoinRequest { request, requester }
            })
            .collect()
    }

    /// The pair's most recent request by submission time, regardless of
    /// status. Storage failures degrade to `None`.
    pub async fn get_user_join_request_status(
        &self,
        community_id: Uuid,
        user_id: Uuid,
    ) -> Option<JoinRequest> {
        match join_requests::list_for_pair(&*self.store, community_id, user_id).await {
            Ok(history) => history.into_iter().max_by_key(|r| (r.requested_at, r.id)),
            Err(e) => {
                tracing::error!(
                    community_id = %community_id,
                    user_id = %user_id,
                    error = %e,
                    "Failed to load join request history"
                );
                None
            }
        }
    }

    /// Approve every pending request for a community. Used when a community
    /// goes public.
    ///
    /// Requests are settled one at a time with no overall transaction; a
    /// failure partway through propagates and leaves the earlier approvals
    /// standing. Each requester is notified with the made-public reason.
    /// Returns how many requests were approved.
    pub async fn auto_approve_all_pending_requests(
        &self,
        community_id: Uuid,
    ) -> GatherResult<usize> {
        let pending = join_requests::list_pending(&*self.store, community_id).await?;

        let mut approved = 0usize;
        for request in pending {
            // Refetch so each approval sees the member list the previous one
            // wrote
            let community = communities::find_by_id(&*self.store, community_id)
                .await?
                .ok_or(GatherError::NotFound {
                    resource: "Community".into(),
                })?;

            self.grant_membership(&community, &request).await?;
            join_requests::mark_resolved(
                &*self.store,
                request.id,
                JoinRequestStatus::Approved,
                Utc::now(),
                None,
            )
            .await?;

            let notification = Notification::request_approved(
                request.user_id,
                community.id,
                &community.name,
                request.id,
                ApprovalReason::CommunityMadePublic,
            );
            notify::deliver_all(&*self.store, vec![notification]).await;

            self.cache.invalidate(request.community_id, request.user_id);
            approved += 1;
        }

        if approved > 0 {
            tracing::info!(
                community_id = %community_id,
                approved,
                "Auto-approved pending join requests"
            );
        }
        Ok(approved)
    }

    /// The requester's display name for notifications and summaries.
    /// Lookup failures fall back to a placeholder rather than blocking the
    /// operation the name decorates.
    async fn requester_name(&self, user_id: Uuid) -> String {
        match users::find_by_id(&*self.store, user_id).await {
            Ok(Some(profile)) => profile.display_name,
            Ok(None) => "Unknown user".to_string(),
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    error = %e,
                    "Could not load requester profile"
                );
                "Unknown user".to_string()
            }
        }
    }
}
