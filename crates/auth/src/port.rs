//! Storage and security collaborators the auth services consume.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ays_core::{DomainResult, InstitutionId, ListPort, PermissionId, RoleId, ScopedReadPort};

use crate::claims::Claims;
use crate::permissions::Permission;
use crate::roles::{Role, RoleFilter};
use crate::user::{Password, User};

/// Role reads. Listing and by-id lookup are always institution scoped.
pub trait RoleReadPort: ListPort<Role, RoleFilter> + ScopedReadPort<Role, RoleId> {
    /// Every role of one institution, storage order.
    fn find_all_by_institution_id(&self, institution_id: &InstitutionId) -> DomainResult<Vec<Role>>;

    fn exists_by_name_and_institution_id(
        &self,
        name: &str,
        institution_id: &InstitutionId,
    ) -> DomainResult<bool>;
}

pub trait RoleSavePort: Send + Sync {
    fn save(&self, role: &Role) -> DomainResult<()>;
}

pub trait PermissionReadPort: Send + Sync {
    fn find_all(&self) -> DomainResult<Vec<Permission>>;

    /// The permissions among `ids` that exist. Unknown ids are skipped.
    fn find_all_by_ids(&self, ids: &[PermissionId]) -> DomainResult<Vec<Permission>>;
}

pub trait UserReadPort: Send + Sync {
    /// Looks a user up by email address, with roles and institution resolved.
    fn find_by_email_address(&self, email_address: &str) -> DomainResult<Option<User>>;
}

pub trait UserSavePort: Send + Sync {
    fn save(&self, user: &User) -> DomainResult<()>;
}

/// Checks a raw password against a stored hash. Hashing stays external.
pub trait PasswordVerifier: Send + Sync {
    fn matches(&self, raw: &str, password: &Password) -> bool;
}

/// Signed session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
}

/// Signs claims into a session token. Signing stays external.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, claims: &Claims) -> DomainResult<Token>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared handles
// ─────────────────────────────────────────────────────────────────────────────

impl<P> RoleReadPort for Arc<P>
where
    P: RoleReadPort + ?Sized,
{
    fn find_all_by_institution_id(&self, institution_id: &InstitutionId) -> DomainResult<Vec<Role>> {
        (**self).find_all_by_institution_id(institution_id)
    }

    fn exists_by_name_and_institution_id(
        &self,
        name: &str,
        institution_id: &InstitutionId,
    ) -> DomainResult<bool> {
        (**self).exists_by_name_and_institution_id(name, institution_id)
    }
}

impl<P> RoleSavePort for Arc<P>
where
    P: RoleSavePort + ?Sized,
{
    fn save(&self, role: &Role) -> DomainResult<()> {
        (**self).save(role)
    }
}

impl<P> PermissionReadPort for Arc<P>
where
    P: PermissionReadPort + ?Sized,
{
    fn find_all(&self) -> DomainResult<Vec<Permission>> {
        (**self).find_all()
    }

    fn find_all_by_ids(&self, ids: &[PermissionId]) -> DomainResult<Vec<Permission>> {
        (**self).find_all_by_ids(ids)
    }
}

impl<P> UserReadPort for Arc<P>
where
    P: UserReadPort + ?Sized,
{
    fn find_by_email_address(&self, email_address: &str) -> DomainResult<Option<User>> {
        (**self).find_by_email_address(email_address)
    }
}

impl<P> UserSavePort for Arc<P>
where
    P: UserSavePort + ?Sized,
{
    fn save(&self, user: &User) -> DomainResult<()> {
        (**self).save(user)
    }
}

impl<P> PasswordVerifier for Arc<P>
where
    P: PasswordVerifier + ?Sized,
{
    fn matches(&self, raw: &str, password: &Password) -> bool {
        (**self).matches(raw, password)
    }
}

impl<P> TokenIssuer for Arc<P>
where
    P: TokenIssuer + ?Sized,
{
    fn issue(&self, claims: &Claims) -> DomainResult<Token> {
        (**self).issue(claims)
    }
}
