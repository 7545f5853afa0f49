use serde::{Deserialize, Serialize};

use ays_core::{DomainError, DomainResult, Entity, InstitutionId, impl_identity_eq};

/// Institution lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstitutionStatus {
    Active,
    Passive,
    Deleted,
}

impl core::fmt::Display for InstitutionStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InstitutionStatus::Active => write!(f, "ACTIVE"),
            InstitutionStatus::Passive => write!(f, "PASSIVE"),
            InstitutionStatus::Deleted => write!(f, "DELETED"),
        }
    }
}

/// The tenant a user belongs to.
///
/// Users and roles only ever hold read-only references to an institution; it
/// is owned and mutated elsewhere.
#[derive(Debug, Clone, Serialize)]
pub struct Institution {
    id: InstitutionId,
    name: String,
    status: InstitutionStatus,
}

impl_identity_eq!(Institution);

impl Entity for Institution {
    type Id = InstitutionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Institution {
    pub fn new(id: InstitutionId, name: impl Into<String>, status: InstitutionStatus) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("institution name cannot be empty"));
        }
        Ok(Self { id, name, status })
    }

    pub fn id(&self) -> InstitutionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> InstitutionStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == InstitutionStatus::Active
    }
}
