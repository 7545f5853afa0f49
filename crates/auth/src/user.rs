//! User account: profile, credential, login bookkeeping and role grants.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ays_core::{DomainError, DomainResult, Entity, PhoneNumber, UserId, impl_identity_eq};
use ays_institution::Institution;

use crate::roles::Role;

// ─────────────────────────────────────────────────────────────────────────────
// User Status
// ─────────────────────────────────────────────────────────────────────────────

/// User account status. Exactly one holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Passive,
    Deleted,
    NotVerified,
}

impl core::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "ACTIVE"),
            UserStatus::Passive => write!(f, "PASSIVE"),
            UserStatus::Deleted => write!(f, "DELETED"),
            UserStatus::NotVerified => write!(f, "NOT_VERIFIED"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Credential / Login bookkeeping
// ─────────────────────────────────────────────────────────────────────────────

/// Hashed credential owned 1:1 by a user.
///
/// `Debug` never prints the hash and the type is not serializable.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    id: Uuid,
    hashed_value: String,
}

impl Password {
    pub fn new(id: Uuid, hashed_value: impl Into<String>) -> Self {
        Self {
            id,
            hashed_value: hashed_value.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn hashed_value(&self) -> &str {
        &self.hashed_value
    }
}

impl core::fmt::Debug for Password {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Password")
            .field("id", &self.id)
            .field("hashed_value", &"<redacted>")
            .finish()
    }
}

/// Last successful login of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginAttempt {
    id: Uuid,
    last_login_at: Option<DateTime<Utc>>,
}

impl LoginAttempt {
    /// A user that never logged in.
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            last_login_at: None,
        }
    }

    pub fn rehydrate(id: Uuid, last_login_at: Option<DateTime<Utc>>) -> Self {
        Self { id, last_login_at }
    }

    /// Records a successful login at `now`.
    pub fn success(&mut self, now: DateTime<Utc>) {
        self.last_login_at = Some(now);
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }
}

impl Default for LoginAttempt {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

/// Contact details of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email_address: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<PhoneNumber>,
    pub city: Option<String>,
}

impl UserProfile {
    fn validate(&self) -> DomainResult<()> {
        let email = self.email_address.trim();
        let valid_email = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid_email {
            return Err(DomainError::validation(format!(
                "invalid email address '{}'",
                self.email_address
            )));
        }
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(DomainError::validation("first and last name are required"));
        }
        Ok(())
    }
}

/// A person who can log in on behalf of an institution.
///
/// # Invariants
/// - Status changes only through [`User::activate`], [`User::passivate`],
///   [`User::delete`] and [`User::not_verify`].
/// - An active user that logs in holds at least one role (checked at login).
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    profile: UserProfile,
    status: UserStatus,
    password: Password,
    login_attempt: Option<LoginAttempt>,
    roles: Vec<Role>,
    institution: Option<Institution>,
}

impl_identity_eq!(User);

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl User {
    pub fn new(
        id: UserId,
        profile: UserProfile,
        status: UserStatus,
        password: Password,
    ) -> DomainResult<Self> {
        profile.validate()?;
        Ok(Self {
            id,
            profile,
            status,
            password,
            login_attempt: None,
            roles: Vec::new(),
            institution: None,
        })
    }

    pub fn with_roles(mut self, roles: Vec<Role>) -> Self {
        self.roles = roles;
        self
    }

    pub fn with_institution(mut self, institution: Institution) -> Self {
        self.institution = Some(institution);
        self
    }

    pub fn with_login_attempt(mut self, login_attempt: LoginAttempt) -> Self {
        self.login_attempt = Some(login_attempt);
        self
    }

    // Lifecycle. Transitions are unconditional.

    pub fn activate(&mut self) {
        self.status = UserStatus::Active;
    }

    pub fn passivate(&mut self) {
        self.status = UserStatus::Passive;
    }

    pub fn delete(&mut self) {
        self.status = UserStatus::Deleted;
    }

    pub fn not_verify(&mut self) {
        self.status = UserStatus::NotVerified;
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    pub fn is_passive(&self) -> bool {
        self.status == UserStatus::Passive
    }

    pub fn is_deleted(&self) -> bool {
        self.status == UserStatus::Deleted
    }

    pub fn is_not_verified(&self) -> bool {
        self.status == UserStatus::NotVerified
    }

    /// Records a successful login, creating the login record on first use.
    pub fn record_login(&mut self, now: DateTime<Utc>) {
        self.login_attempt
            .get_or_insert_with(LoginAttempt::new)
            .success(now);
    }

    /// Union of the permission names granted by all roles, one entry per name.
    pub fn permission_names(&self) -> BTreeSet<String> {
        self.roles
            .iter()
            .flat_map(|role| role.permissions())
            .map(|permission| permission.name().to_string())
            .collect()
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn email_address(&self) -> &str {
        &self.profile.email_address
    }

    pub fn first_name(&self) -> &str {
        &self.profile.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.profile.last_name
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    pub fn password(&self) -> &Password {
        &self.password
    }

    pub fn login_attempt(&self) -> Option<&LoginAttempt> {
        self.login_attempt.as_ref()
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn institution(&self) -> Option<&Institution> {
        self.institution.as_ref()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::permissions::Permission;
    use ays_core::{InstitutionId, PermissionId};
    use ays_institution::InstitutionStatus;

    pub fn institution() -> Institution {
        Institution::new(InstitutionId::new(), "Afet Koordinasyon", InstitutionStatus::Active)
            .unwrap()
    }

    pub fn role_granting(institution_id: InstitutionId, names: &[&str]) -> Role {
        let permissions = names
            .iter()
            .map(|name| Permission::new(PermissionId::new(), *name).unwrap())
            .collect();
        Role::create(institution_id, format!("role of {names:?}"), permissions, Utc::now()).unwrap()
    }

    pub fn user(status: UserStatus) -> User {
        User::new(
            UserId::new(),
            UserProfile {
                email_address: "ayse@example.org".to_string(),
                first_name: "Ayse".to_string(),
                last_name: "Yilmaz".to_string(),
                phone_number: None,
                city: Some("Izmir".to_string()),
            },
            status,
            Password::new(Uuid::now_v7(), "$2a$10$hash"),
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn invalid_email_is_rejected() {
        let mut profile = user(UserStatus::Active).profile().clone();
        profile.email_address = "not-an-email".to_string();

        let result = User::new(
            UserId::new(),
            profile,
            UserStatus::Active,
            Password::new(Uuid::now_v7(), "x"),
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn lifecycle_sets_exactly_one_status() {
        let mut user = user(UserStatus::NotVerified);
        assert!(user.is_not_verified());

        user.activate();
        assert!(user.is_active() && !user.is_passive() && !user.is_deleted());
        user.passivate();
        assert!(user.is_passive() && !user.is_active());
        user.delete();
        assert!(user.is_deleted() && !user.is_passive());
        user.not_verify();
        assert!(user.is_not_verified() && !user.is_deleted());
    }

    #[test]
    fn deleted_user_can_be_reactivated_at_object_level() {
        let mut user = user(UserStatus::Active);

        user.delete();
        assert_eq!(user.status(), UserStatus::Deleted);
        user.activate();
        assert_eq!(user.status(), UserStatus::Active);
    }

    #[test]
    fn password_debug_redacts_the_hash() {
        let rendered = format!("{:?}", user(UserStatus::Active));
        assert!(!rendered.contains("$2a$10$hash"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn first_login_creates_the_login_record() {
        let mut user = user(UserStatus::Active);
        assert!(user.login_attempt().is_none());

        let now = Utc::now();
        user.record_login(now);

        assert_eq!(user.login_attempt().unwrap().last_login_at(), Some(now));
    }

    #[test]
    fn user_without_roles_has_no_permissions() {
        assert!(user(UserStatus::Active).permission_names().is_empty());
    }

    #[test]
    fn shared_permissions_appear_once() {
        let institution = institution();
        let user = user(UserStatus::Active).with_roles(vec![
            role_granting(institution.id(), &["role:list", "role:create"]),
            role_granting(institution.id(), &["role:list", "assignment:list"]),
        ]);

        let names: Vec<_> = user.permission_names().into_iter().collect();
        assert_eq!(names, vec!["assignment:list", "role:create", "role:list"]);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the derived permission set is exactly the union of the
        /// names granted by every role, without repeats.
        #[test]
        fn permission_names_are_the_deduplicated_union(
            grants in proptest::collection::vec(
                proptest::collection::vec(
                    proptest::sample::select(crate::permissions::names::ALL.to_vec()),
                    1..5,
                ),
                0..5,
            )
        ) {
            let institution = institution();
            let roles = grants
                .iter()
                .map(|names| role_granting(institution.id(), names))
                .collect();
            let user = user(UserStatus::Active).with_roles(roles);

            let derived = user.permission_names();
            let expected: BTreeSet<String> = grants
                .iter()
                .flatten()
                .map(|name| name.to_string())
                .collect();

            prop_assert_eq!(&derived, &expected);
            let total: usize = user.roles().iter().map(|r| r.permissions().len()).sum();
            prop_assert!(derived.len() <= total);
        }
    }
}
