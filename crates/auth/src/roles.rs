use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ays_core::{
    DomainError, DomainResult, Entity, Filter, InstitutionId, PermissionId, RoleId,
    impl_identity_eq,
};

use crate::permissions::Permission;

// ─────────────────────────────────────────────────────────────────────────────
// Role Status
// ─────────────────────────────────────────────────────────────────────────────

/// Role lifecycle status. Transitions only ever move toward `Deleted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleStatus {
    Active,
    Passive,
    Deleted,
}

impl RoleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleStatus::Active => "ACTIVE",
            RoleStatus::Passive => "PASSIVE",
            RoleStatus::Deleted => "DELETED",
        }
    }
}

impl core::fmt::Display for RoleStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for RoleStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(RoleStatus::Active),
            "PASSIVE" => Ok(RoleStatus::Passive),
            "DELETED" => Ok(RoleStatus::Deleted),
            other => Err(DomainError::validation(format!("unknown role status '{other}'"))),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Role
// ─────────────────────────────────────────────────────────────────────────────

/// A named bundle of permissions within one institution.
///
/// # Invariants
/// - An `Active` role always holds at least one permission.
/// - The permission list never holds the same permission twice.
/// - Once `Deleted`, a role stays deleted.
#[derive(Debug, Clone, Serialize)]
pub struct Role {
    id: RoleId,
    institution_id: InstitutionId,
    name: String,
    status: RoleStatus,
    permissions: Vec<Permission>,
    created_at: DateTime<Utc>,
}

impl_identity_eq!(Role);

impl Entity for Role {
    type Id = RoleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Role {
    /// Sort keys a role listing accepts.
    pub const SORTABLE_PROPERTIES: &'static [&'static str] = &["name", "status", "createdAt"];

    /// A brand new, active role.
    pub fn create(
        institution_id: InstitutionId,
        name: impl Into<String>,
        permissions: Vec<Permission>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Self::rehydrate(
            RoleId::new(),
            institution_id,
            name,
            RoleStatus::Active,
            permissions,
            created_at,
        )
    }

    /// Rebuilds a stored role, re-checking its invariants.
    pub fn rehydrate(
        id: RoleId,
        institution_id: InstitutionId,
        name: impl Into<String>,
        status: RoleStatus,
        permissions: Vec<Permission>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("role name cannot be empty"));
        }

        let mut unique = Vec::with_capacity(permissions.len());
        for permission in permissions {
            if !unique.contains(&permission) {
                unique.push(permission);
            }
        }

        let role = Self {
            id,
            institution_id,
            name,
            status,
            permissions: unique,
            created_at,
        };
        role.ensure_permissions_when_active()?;
        Ok(role)
    }

    fn ensure_permissions_when_active(&self) -> DomainResult<()> {
        if self.status == RoleStatus::Active && self.permissions.is_empty() {
            return Err(DomainError::validation(format!(
                "active role '{}' must grant at least one permission",
                self.name
            )));
        }
        Ok(())
    }

    fn ensure_not_deleted(&self) -> DomainResult<()> {
        if self.is_deleted() {
            return Err(DomainError::validation(format!(
                "role is deleted! id:{}",
                self.id
            )));
        }
        Ok(())
    }

    pub fn activate(&mut self) -> DomainResult<()> {
        self.ensure_not_deleted()?;
        if self.is_active() {
            return Err(DomainError::validation(format!("role is already active! id:{}", self.id)));
        }
        if self.permissions.is_empty() {
            return Err(DomainError::validation(format!(
                "role without permissions cannot be activated! id:{}",
                self.id
            )));
        }
        self.status = RoleStatus::Active;
        Ok(())
    }

    pub fn passivate(&mut self) -> DomainResult<()> {
        self.ensure_not_deleted()?;
        if self.is_passive() {
            return Err(DomainError::validation(format!("role is already passive! id:{}", self.id)));
        }
        self.status = RoleStatus::Passive;
        Ok(())
    }

    pub fn delete(&mut self) -> DomainResult<()> {
        self.ensure_not_deleted()?;
        self.status = RoleStatus::Deleted;
        Ok(())
    }

    pub fn id(&self) -> RoleId {
        self.id
    }

    pub fn institution_id(&self) -> InstitutionId {
        self.institution_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> RoleStatus {
        self.status
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_active(&self) -> bool {
        self.status == RoleStatus::Active
    }

    pub fn is_passive(&self) -> bool {
        self.status == RoleStatus::Passive
    }

    pub fn is_deleted(&self) -> bool {
        self.status == RoleStatus::Deleted
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands / Filters
// ─────────────────────────────────────────────────────────────────────────────

/// Create a role in the caller's institution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRole {
    pub name: String,
    pub permission_ids: BTreeSet<PermissionId>,
}

/// Role listing constraints. Absent fields do not narrow the listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleFilter {
    /// Institution the listing is confined to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution_id: Option<InstitutionId>,
    /// Any-of match on status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statuses: Option<BTreeSet<RoleStatus>>,
    /// Case-insensitive "contains" match on name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Filter for RoleFilter {
    fn institution_id(&self) -> Option<InstitutionId> {
        self.institution_id
    }
}

impl RoleFilter {
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = RoleStatus>) -> Self {
        self.statuses = Some(statuses.into_iter().collect());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn scoped_to(mut self, institution_id: InstitutionId) -> Self {
        self.institution_id = Some(institution_id);
        self
    }

    /// Whether `role` passes every present constraint.
    pub fn matches(&self, role: &Role) -> bool {
        let institution_ok = self
            .institution_id
            .is_none_or(|id| role.institution_id() == id);
        let status_ok = self
            .statuses
            .as_ref()
            .is_none_or(|statuses| statuses.contains(&role.status()));
        let name_ok = self.name.as_deref().is_none_or(|needle| {
            role.name()
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });
        institution_ok && status_ok && name_ok
    }
}
