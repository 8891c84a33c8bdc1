//! Typed path parameter helpers.

use uuid::Uuid;

use filedock_core::error::AppError;

/// Parses a record id from a path segment. A malformed id cannot name any
/// record, so it fails the same way a missing one does.
pub fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found(not_found))
}
