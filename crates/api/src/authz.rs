//! API-side authorization guard.
//!
//! Runs before a controller touches any service: the verified claims become an
//! [`Identity`] and the identity must hold the permission the endpoint needs.

use tracing::debug;

use ays_auth::{Claims, Identity, authorize};
use ays_core::DomainResult;

/// Rebuilds the caller from already verified token claims.
pub fn authenticate(claims: &Claims) -> DomainResult<Identity> {
    Identity::from_claims(claims)
}

/// [`authenticate`], then require `permission`.
pub fn require(claims: &Claims, permission: &str) -> DomainResult<Identity> {
    let identity = authenticate(claims)?;
    authorize(&identity, permission)?;
    debug!(user_id = %identity.user_id, permission, "authorized");
    Ok(identity)
}
