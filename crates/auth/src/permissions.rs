use serde::{Deserialize, Serialize};

use ays_core::{DomainError, DomainResult, Entity, PermissionId, impl_identity_eq};

/// Names of the permissions the boundary checks before dispatching.
///
/// Permissions are `resource:action` strings; a role grants them by name.
pub mod names {
    pub const ROLE_LIST: &str = "role:list";
    pub const ROLE_DETAIL: &str = "role:detail";
    pub const ROLE_CREATE: &str = "role:create";
    pub const ROLE_UPDATE: &str = "role:update";
    pub const ROLE_DELETE: &str = "role:delete";
    pub const ASSIGNMENT_LIST: &str = "assignment:list";
    pub const ASSIGNMENT_DETAIL: &str = "assignment:detail";
    pub const INSTITUTION_SUMMARY: &str = "institution:summary";

    pub const ALL: &[&str] = &[
        ROLE_LIST,
        ROLE_DETAIL,
        ROLE_CREATE,
        ROLE_UPDATE,
        ROLE_DELETE,
        ASSIGNMENT_LIST,
        ASSIGNMENT_DETAIL,
        INSTITUTION_SUMMARY,
    ];
}

/// A named capability. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    id: PermissionId,
    name: String,
}

impl_identity_eq!(Permission);

impl Entity for Permission {
    type Id = PermissionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Permission {
    pub fn new(id: PermissionId, name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("permission name cannot be empty"));
        }
        Ok(Self { id, name })
    }

    pub fn id(&self) -> PermissionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}
