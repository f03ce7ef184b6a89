//! # gather-community
//!
//! Community membership and join request services.
//!
//! [`MembershipService`] answers "is this user a member of this community"
//! from two storage representations behind a short-lived cache, and handles
//! the public join and leave paths. [`JoinRequestService`] runs the full
//! lifecycle of private-community join requests: submit, cancel, admin
//! approval and rejection, and batch auto-approval when a community goes
//! public. The two share a cache handle so approvals are visible immediately.

pub mod cache;
pub mod join_requests;
pub mod membership;

mod notify;

pub use cache::MembershipCache;
pub use join_requests::{JoinDecision, JoinRequestService, PendingJoinRequest};
pub use membership::{JoinOutcome, JoinState, MembershipService};
