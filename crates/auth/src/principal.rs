use std::collections::BTreeSet;

use serde::Serialize;

use ays_core::{DomainError, DomainResult, InstitutionId, UserId};

use crate::claims::{Claims, TokenClaim};

/// The authenticated caller of a request.
///
/// Built from the claims of a token the transport layer already verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: UserId,
    pub institution_id: InstitutionId,
    pub permissions: BTreeSet<String>,
}

impl Identity {
    pub fn new(
        user_id: UserId,
        institution_id: InstitutionId,
        permissions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            user_id,
            institution_id,
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// Reads the caller out of verified claims.
    ///
    /// Missing or malformed identity claims mean the token cannot identify
    /// anyone, so they are reported as [`DomainError::Unauthenticated`].
    pub fn from_claims(claims: &Claims) -> DomainResult<Self> {
        let user_id = parse_claim::<UserId>(claims, TokenClaim::UserId)?;
        let institution_id = parse_claim::<InstitutionId>(claims, TokenClaim::InstitutionId)?;
        let permissions = claims.permissions().ok_or_else(|| {
            DomainError::unauthenticated(format!("claim '{}' is missing", TokenClaim::UserPermissions))
        })?;

        Ok(Self {
            user_id,
            institution_id,
            permissions,
        })
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// Resolves the institution a listing runs against.
    ///
    /// A request that names another institution is denied; no request ever
    /// widens the caller's scope.
    pub fn scope(&self, requested: Option<InstitutionId>) -> DomainResult<InstitutionId> {
        match requested {
            Some(other) if other != self.institution_id => Err(DomainError::denied(format!(
                "user {} cannot access institution {}",
                self.user_id, other
            ))),
            _ => Ok(self.institution_id),
        }
    }
}

fn parse_claim<T>(claims: &Claims, claim: TokenClaim) -> DomainResult<T>
where
    T: core::str::FromStr,
{
    claims
        .str(claim)
        .and_then(|raw| raw.parse::<T>().ok())
        .ok_or_else(|| DomainError::unauthenticated(format!("claim '{claim}' is missing or invalid")))
}
