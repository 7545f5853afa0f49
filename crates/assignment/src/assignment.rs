use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ays_core::{
    AssignmentId, DomainError, DomainResult, Entity, Filter, InstitutionId, PhoneNumber,
    impl_identity_eq,
};

/// Where an assignment is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    Available,
    Reserved,
    Assigned,
    InProgress,
    Done,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Available => "AVAILABLE",
            AssignmentStatus::Reserved => "RESERVED",
            AssignmentStatus::Assigned => "ASSIGNED",
            AssignmentStatus::InProgress => "IN_PROGRESS",
            AssignmentStatus::Done => "DONE",
        }
    }
}

impl core::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for AssignmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(AssignmentStatus::Available),
            "RESERVED" => Ok(AssignmentStatus::Reserved),
            "ASSIGNED" => Ok(AssignmentStatus::Assigned),
            "IN_PROGRESS" => Ok(AssignmentStatus::InProgress),
            "DONE" => Ok(AssignmentStatus::Done),
            other => Err(DomainError::validation(format!(
                "unknown assignment status '{other}'"
            ))),
        }
    }
}

/// Descriptive part of an assignment, as entered by the institution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDetails {
    pub description: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: PhoneNumber,
}

/// A unit of field work owned by one institution.
#[derive(Debug, Clone, Serialize)]
pub struct Assignment {
    id: AssignmentId,
    institution_id: InstitutionId,
    details: AssignmentDetails,
    status: AssignmentStatus,
    created_at: DateTime<Utc>,
}

impl_identity_eq!(Assignment);

impl Entity for Assignment {
    type Id = AssignmentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Assignment {
    /// Sort keys an assignment listing accepts.
    pub const SORTABLE_PROPERTIES: &'static [&'static str] = &["createdAt", "status"];

    pub fn rehydrate(
        id: AssignmentId,
        institution_id: InstitutionId,
        details: AssignmentDetails,
        status: AssignmentStatus,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if details.description.trim().is_empty() {
            return Err(DomainError::validation("assignment description cannot be empty"));
        }
        Ok(Self {
            id,
            institution_id,
            details,
            status,
            created_at,
        })
    }

    pub fn id(&self) -> AssignmentId {
        self.id
    }

    pub fn institution_id(&self) -> InstitutionId {
        self.institution_id
    }

    pub fn details(&self) -> &AssignmentDetails {
        &self.details
    }

    pub fn description(&self) -> &str {
        &self.details.description
    }

    pub fn first_name(&self) -> &str {
        &self.details.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.details.last_name
    }

    pub fn phone_number(&self) -> &PhoneNumber {
        &self.details.phone_number
    }

    pub fn status(&self) -> AssignmentStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Assignment listing constraints. Absent fields do not narrow the listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution_id: Option<InstitutionId>,
    /// Any-of match on status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statuses: Option<BTreeSet<AssignmentStatus>>,
    /// Exact match on both phone number parts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<PhoneNumber>,
}

impl Filter for AssignmentFilter {
    fn institution_id(&self) -> Option<InstitutionId> {
        self.institution_id
    }
}

impl AssignmentFilter {
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = AssignmentStatus>) -> Self {
        self.statuses = Some(statuses.into_iter().collect());
        self
    }

    pub fn with_phone_number(mut self, phone_number: PhoneNumber) -> Self {
        self.phone_number = Some(phone_number);
        self
    }

    pub fn scoped_to(mut self, institution_id: InstitutionId) -> Self {
        self.institution_id = Some(institution_id);
        self
    }

    pub fn matches(&self, assignment: &Assignment) -> bool {
        self.institution_id
            .is_none_or(|id| assignment.institution_id() == id)
            && self
                .statuses
                .as_ref()
                .is_none_or(|statuses| statuses.contains(&assignment.status()))
            && self
                .phone_number
                .as_ref()
                .is_none_or(|phone| assignment.phone_number() == phone)
    }
}
