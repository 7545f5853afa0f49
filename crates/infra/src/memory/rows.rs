//! Row shapes of the in-memory tables.
//!
//! Rows are flat and keep statuses as their wire strings, the way a
//! relational table would; turning them back into domain types can fail.
//! Sorting by status follows the status enum's declaration order, not the
//! strings. Unreadable statuses sort first.

use core::cmp::Ordering;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use ays_assignment::AssignmentStatus;
use ays_auth::RoleStatus;
use ays_core::{AssignmentId, InstitutionId, PermissionId, RoleId, Sortable, UserId};

use super::store::Row;

fn by_status<S: core::str::FromStr + Ord>(left: &str, right: &str) -> Ordering {
    left.parse::<S>().ok().cmp(&right.parse::<S>().ok())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstitutionRow {
    pub id: InstitutionId,
    pub name: String,
    pub status: String,
}

impl Row for InstitutionRow {
    type Key = InstitutionId;

    const TABLE: &'static str = "institution";

    fn key(&self) -> InstitutionId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRow {
    pub id: PermissionId,
    pub name: String,
}

impl Row for PermissionRow {
    type Key = PermissionId;

    const TABLE: &'static str = "permission";

    fn key(&self) -> PermissionId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRow {
    pub id: RoleId,
    pub institution_id: InstitutionId,
    pub name: String,
    pub status: String,
    pub permission_ids: Vec<PermissionId>,
    pub created_at: DateTime<Utc>,
}

impl Row for RoleRow {
    type Key = RoleId;

    const TABLE: &'static str = "role";

    fn key(&self) -> RoleId {
        self.id
    }
}

impl Sortable for RoleRow {
    const SORTABLE_PROPERTIES: &'static [&'static str] = &["name", "status", "createdAt"];

    fn compare_by(&self, other: &Self, property: &str) -> Ordering {
        match property {
            "name" => self.name.cmp(&other.name),
            "status" => by_status::<RoleStatus>(&self.status, &other.status),
            "createdAt" => self.created_at.cmp(&other.created_at),
            _ => Ordering::Equal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: UserId,
    pub email_address: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_country_code: Option<String>,
    pub phone_line_number: Option<String>,
    pub city: Option<String>,
    pub status: String,
    pub password_id: Uuid,
    pub password_hash: String,
    pub login_attempt_id: Option<Uuid>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub role_ids: Vec<RoleId>,
    pub institution_id: Option<InstitutionId>,
}

impl Row for UserRow {
    type Key = UserId;

    const TABLE: &'static str = "user";

    fn key(&self) -> UserId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRow {
    pub id: AssignmentId,
    pub institution_id: InstitutionId,
    pub description: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_country_code: String,
    pub phone_line_number: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Row for AssignmentRow {
    type Key = AssignmentId;

    const TABLE: &'static str = "assignment";

    fn key(&self) -> AssignmentId {
        self.id
    }
}

impl Sortable for AssignmentRow {
    const SORTABLE_PROPERTIES: &'static [&'static str] = &["createdAt", "status"];

    fn compare_by(&self, other: &Self, property: &str) -> Ordering {
        match property {
            "createdAt" => self.created_at.cmp(&other.created_at),
            "status" => by_status::<AssignmentStatus>(&self.status, &other.status),
            _ => Ordering::Equal,
        }
    }
}
