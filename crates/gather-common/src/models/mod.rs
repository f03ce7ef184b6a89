//! Core domain models shared across all Gather services.
//!
//! These are the "truth" types: what the document store holds and what the
//! services hand back to callers. Each model uses UUID v7 for globally unique,
//! time-sortable identifiers.

pub mod community;
pub mod join_request;
pub mod membership;
pub mod notification;
pub mod user;

/// Re-export all model types for convenience.
pub use community::*;
pub use join_request::*;
pub use membership::*;
pub use notification::*;
pub use user::*;
