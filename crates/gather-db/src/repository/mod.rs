//! Repository layer: query functions organized by domain.

pub mod communities;
pub mod join_requests;
pub mod memberships;
pub mod notifications;
pub mod users;

use crate::store::StoreError;

/// Treat a missing document as `None` instead of an error.
pub(crate) fn optional<T>(result: Result<T, StoreError>) -> Result<Option<T>, StoreError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
