//! Row ↔ domain conversions.
//!
//! A row that no longer satisfies the domain invariants is a storage fault,
//! reported as [`StoreError::Mapping`].

use ays_assignment::{Assignment, AssignmentDetails, AssignmentStatus};
use ays_auth::{LoginAttempt, Password, Permission, Role, RoleStatus, User, UserProfile, UserStatus};
use ays_core::{DomainError, PhoneNumber};
use ays_institution::{Institution, InstitutionStatus};

use super::rows::{AssignmentRow, InstitutionRow, PermissionRow, RoleRow, UserRow};
use super::store::{Row, StoreError};

fn invalid<R: Row>(err: DomainError) -> StoreError {
    StoreError::mapping(R::TABLE, err.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Institution / Permission
// ─────────────────────────────────────────────────────────────────────────────

fn institution_status(raw: &str) -> Result<InstitutionStatus, StoreError> {
    match raw {
        "ACTIVE" => Ok(InstitutionStatus::Active),
        "PASSIVE" => Ok(InstitutionStatus::Passive),
        "DELETED" => Ok(InstitutionStatus::Deleted),
        other => Err(StoreError::mapping(
            InstitutionRow::TABLE,
            format!("unknown status '{other}'"),
        )),
    }
}

pub fn institution_from_row(row: &InstitutionRow) -> Result<Institution, StoreError> {
    let status = institution_status(&row.status)?;
    Institution::new(row.id, row.name.clone(), status).map_err(invalid::<InstitutionRow>)
}

pub fn institution_to_row(institution: &Institution) -> InstitutionRow {
    InstitutionRow {
        id: institution.id(),
        name: institution.name().to_string(),
        status: institution.status().to_string(),
    }
}

pub fn permission_from_row(row: &PermissionRow) -> Result<Permission, StoreError> {
    Permission::new(row.id, row.name.clone()).map_err(invalid::<PermissionRow>)
}

pub fn permission_to_row(permission: &Permission) -> PermissionRow {
    PermissionRow {
        id: permission.id(),
        name: permission.name().to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Role
// ─────────────────────────────────────────────────────────────────────────────

/// `permissions` are the rows referenced by `row.permission_ids`, any order.
pub fn role_from_row(row: &RoleRow, permissions: &[PermissionRow]) -> Result<Role, StoreError> {
    let status: RoleStatus = row.status.parse().map_err(invalid::<RoleRow>)?;
    let granted = row
        .permission_ids
        .iter()
        .map(|id| {
            permissions
                .iter()
                .find(|p| p.id == *id)
                .ok_or_else(|| {
                    StoreError::mapping(RoleRow::TABLE, format!("permission {id} is missing"))
                })
                .and_then(permission_from_row)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Role::rehydrate(row.id, row.institution_id, row.name.clone(), status, granted, row.created_at)
        .map_err(invalid::<RoleRow>)
}

pub fn role_to_row(role: &Role) -> RoleRow {
    RoleRow {
        id: role.id(),
        institution_id: role.institution_id(),
        name: role.name().to_string(),
        status: role.status().to_string(),
        permission_ids: role.permissions().iter().map(Permission::id).collect(),
        created_at: role.created_at(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

fn user_status(raw: &str) -> Result<UserStatus, StoreError> {
    match raw {
        "ACTIVE" => Ok(UserStatus::Active),
        "PASSIVE" => Ok(UserStatus::Passive),
        "DELETED" => Ok(UserStatus::Deleted),
        "NOT_VERIFIED" => Ok(UserStatus::NotVerified),
        other => Err(StoreError::mapping(UserRow::TABLE, format!("unknown status '{other}'"))),
    }
}

fn phone_number<R: Row>(country_code: &str, line_number: &str) -> Result<PhoneNumber, StoreError> {
    PhoneNumber::new(country_code, line_number).map_err(invalid::<R>)
}

/// `roles` and `institution` are the already mapped references of `row`.
pub fn user_from_row(
    row: &UserRow,
    roles: Vec<Role>,
    institution: Option<Institution>,
) -> Result<User, StoreError> {
    let phone_number = match (&row.phone_country_code, &row.phone_line_number) {
        (Some(country_code), Some(line_number)) => {
            Some(phone_number::<UserRow>(country_code, line_number)?)
        }
        _ => None,
    };
    let profile = UserProfile {
        email_address: row.email_address.clone(),
        first_name: row.first_name.clone(),
        last_name: row.last_name.clone(),
        phone_number,
        city: row.city.clone(),
    };
    let password = Password::new(row.password_id, row.password_hash.clone());

    let mut user = User::new(row.id, profile, user_status(&row.status)?, password)
        .map_err(invalid::<UserRow>)?
        .with_roles(roles);
    if let Some(institution) = institution {
        user = user.with_institution(institution);
    }
    if let Some(id) = row.login_attempt_id {
        user = user.with_login_attempt(LoginAttempt::rehydrate(id, row.last_login_at));
    }
    Ok(user)
}

pub fn user_to_row(user: &User) -> UserRow {
    let profile = user.profile();
    UserRow {
        id: user.id(),
        email_address: profile.email_address.clone(),
        first_name: profile.first_name.clone(),
        last_name: profile.last_name.clone(),
        phone_country_code: profile
            .phone_number
            .as_ref()
            .map(|p| p.country_code().to_string()),
        phone_line_number: profile
            .phone_number
            .as_ref()
            .map(|p| p.line_number().to_string()),
        city: profile.city.clone(),
        status: user.status().to_string(),
        password_id: user.password().id(),
        password_hash: user.password().hashed_value().to_string(),
        login_attempt_id: user.login_attempt().map(LoginAttempt::id),
        last_login_at: user.login_attempt().and_then(LoginAttempt::last_login_at),
        role_ids: user.roles().iter().map(Role::id).collect(),
        institution_id: user.institution().map(Institution::id),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Assignment
// ─────────────────────────────────────────────────────────────────────────────

pub fn assignment_from_row(row: &AssignmentRow) -> Result<Assignment, StoreError> {
    let status: AssignmentStatus = row.status.parse().map_err(invalid::<AssignmentRow>)?;
    let details = AssignmentDetails {
        description: row.description.clone(),
        first_name: row.first_name.clone(),
        last_name: row.last_name.clone(),
        phone_number: phone_number::<AssignmentRow>(&row.phone_country_code, &row.phone_line_number)?,
    };
    Assignment::rehydrate(row.id, row.institution_id, details, status, row.created_at)
        .map_err(invalid::<AssignmentRow>)
}

pub fn assignment_to_row(assignment: &Assignment) -> AssignmentRow {
    AssignmentRow {
        id: assignment.id(),
        institution_id: assignment.institution_id(),
        description: assignment.description().to_string(),
        first_name: assignment.first_name().to_string(),
        last_name: assignment.last_name().to_string(),
        phone_country_code: assignment.phone_number().country_code().to_string(),
        phone_line_number: assignment.phone_number().line_number().to_string(),
        status: assignment.status().to_string(),
        created_at: assignment.created_at(),
    }
}
