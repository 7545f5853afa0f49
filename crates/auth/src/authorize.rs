use tracing::debug;

use ays_core::{DomainError, DomainResult};

use crate::principal::Identity;

/// Authorize `identity` for `required`.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(identity: &Identity, required: &str) -> DomainResult<()> {
    if identity.has_permission(required) {
        Ok(())
    } else {
        debug!(user_id = %identity.user_id, permission = required, "permission missing");
        Err(DomainError::denied(format!("missing permission '{required}'")))
    }
}
