//! Session-token claims derived from an authenticated user.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use ays_core::{DomainError, DomainResult};

use crate::user::User;

/// Claim names carried in an issued token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenClaim {
    InstitutionId,
    InstitutionName,
    UserId,
    UserFirstName,
    UserLastName,
    UserEmailAddress,
    UserPermissions,
    UserLastLoginAt,
}

impl TokenClaim {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TokenClaim::InstitutionId => "institutionId",
            TokenClaim::InstitutionName => "institutionName",
            TokenClaim::UserId => "userId",
            TokenClaim::UserFirstName => "userFirstName",
            TokenClaim::UserLastName => "userLastName",
            TokenClaim::UserEmailAddress => "userEmailAddress",
            TokenClaim::UserPermissions => "userPermissions",
            TokenClaim::UserLastLoginAt => "userLastLoginAt",
        }
    }
}

impl core::fmt::Display for TokenClaim {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat claims map handed to the token issuer.
///
/// Serializes as a plain JSON object keyed by [`TokenClaim`] names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(BTreeMap<String, Value>);

impl Claims {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, claim: TokenClaim, value: impl Into<Value>) {
        self.0.insert(claim.as_str().to_string(), value.into());
    }

    pub fn get(&self, claim: TokenClaim) -> Option<&Value> {
        self.0.get(claim.as_str())
    }

    pub fn contains(&self, claim: TokenClaim) -> bool {
        self.0.contains_key(claim.as_str())
    }

    pub fn str(&self, claim: TokenClaim) -> Option<&str> {
        self.get(claim).and_then(Value::as_str)
    }

    /// Permission names, or `None` when the claim is missing or malformed.
    pub fn permissions(&self) -> Option<BTreeSet<String>> {
        self.get(TokenClaim::UserPermissions)?
            .as_array()?
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.str(TokenClaim::UserLastLoginAt)?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|at| at.with_timezone(&Utc))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Builds the claims for `user`.
///
/// Identity, profile and permission claims are always present; the permission
/// claim is an empty array for a user without roles. The last-login claim is
/// present only when the user has a recorded login time.
///
/// A user without a resolved institution is a caller bug and yields
/// [`DomainError::PreconditionViolation`].
pub fn build_claims(user: &User) -> DomainResult<Claims> {
    let institution = user.institution().ok_or_else(|| {
        DomainError::precondition(format!(
            "claims requested for user without institution! id:{}",
            user.id()
        ))
    })?;

    let mut claims = Claims::new();
    claims.insert(TokenClaim::InstitutionId, institution.id().to_string());
    claims.insert(TokenClaim::InstitutionName, institution.name());
    claims.insert(TokenClaim::UserId, user.id().to_string());
    claims.insert(TokenClaim::UserFirstName, user.first_name());
    claims.insert(TokenClaim::UserLastName, user.last_name());
    claims.insert(TokenClaim::UserEmailAddress, user.email_address());
    claims.insert(
        TokenClaim::UserPermissions,
        user.permission_names().into_iter().collect::<Vec<_>>(),
    );

    if let Some(last_login_at) = user.login_attempt().and_then(|a| a.last_login_at()) {
        claims.insert(
            TokenClaim::UserLastLoginAt,
            last_login_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        );
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::fixtures::{institution, role_granting, user};
    use crate::user::{LoginAttempt, UserStatus};
    use chrono::TimeZone;
    use uuid::Uuid;

    #[test]
    fn required_claims_are_always_present() {
        let institution = institution();
        let user = user(UserStatus::Active)
            .with_institution(institution.clone())
            .with_roles(vec![role_granting(institution.id(), &["role:create"])]);

        let claims = build_claims(&user).unwrap();

        assert_eq!(
            claims.str(TokenClaim::InstitutionId),
            Some(institution.id().to_string().as_str())
        );
        assert_eq!(claims.str(TokenClaim::InstitutionName), Some("Afet Koordinasyon"));
        assert_eq!(claims.str(TokenClaim::UserId), Some(user.id().to_string().as_str()));
        assert_eq!(claims.str(TokenClaim::UserFirstName), Some("Ayse"));
        assert_eq!(claims.str(TokenClaim::UserLastName), Some("Yilmaz"));
        assert_eq!(claims.str(TokenClaim::UserEmailAddress), Some("ayse@example.org"));
        assert_eq!(
            claims.permissions(),
            Some(BTreeSet::from(["role:create".to_string()]))
        );
    }

    #[test]
    fn user_without_roles_gets_empty_permission_set() {
        let user = user(UserStatus::Active).with_institution(institution());

        let claims = build_claims(&user).unwrap();

        assert_eq!(claims.permissions(), Some(BTreeSet::new()));
        assert_eq!(claims.get(TokenClaim::UserPermissions), Some(&Value::Array(vec![])));
    }

    #[test]
    fn last_login_is_omitted_without_login_record_or_time() {
        let never_recorded = user(UserStatus::Active).with_institution(institution());
        assert!(!build_claims(&never_recorded).unwrap().contains(TokenClaim::UserLastLoginAt));

        let never_logged_in = user(UserStatus::Active)
            .with_institution(institution())
            .with_login_attempt(LoginAttempt::new());
        assert!(!build_claims(&never_logged_in).unwrap().contains(TokenClaim::UserLastLoginAt));
    }

    #[test]
    fn last_login_carries_the_stored_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 2, 6, 4, 17, 35).unwrap();
        let user = user(UserStatus::Active)
            .with_institution(institution())
            .with_login_attempt(LoginAttempt::rehydrate(Uuid::now_v7(), Some(at)));

        let claims = build_claims(&user).unwrap();

        assert_eq!(claims.str(TokenClaim::UserLastLoginAt), Some("2024-02-06T04:17:35Z"));
        assert_eq!(claims.last_login_at(), Some(at));
    }

    #[test]
    fn missing_institution_is_a_precondition_violation() {
        let result = build_claims(&user(UserStatus::Active));
        assert!(matches!(result, Err(DomainError::PreconditionViolation(_))));
    }

    #[test]
    fn claims_serialize_as_a_flat_object() {
        let claims = build_claims(&user(UserStatus::Active).with_institution(institution())).unwrap();
        let json = serde_json::to_value(&claims).unwrap();

        assert!(json.is_object());
        assert_eq!(json["userFirstName"], "Ayse");
        assert!(json.get("password").is_none());
    }
}
