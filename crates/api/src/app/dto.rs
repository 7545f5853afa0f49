//! Request/response DTOs and their mapping to and from domain types.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ays_assignment::{Assignment, AssignmentFilter, AssignmentStatus};
use ays_auth::{CreateRole, Permission, Role, RoleFilter, RoleStatus};
use ays_core::{
    AssignmentId, DomainError, DomainResult, InstitutionId, Order, Page, Pageable, PagingLimits,
    PermissionId, PhoneNumber, RoleId,
};
use ays_institution::Institution;

use crate::app::errors::HttpStatus;

// ─────────────────────────────────────────────────────────────────────────────
// Envelopes
// ─────────────────────────────────────────────────────────────────────────────

/// Successful response body. `response` is absent for operations without a
/// payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response<T> {
    pub time: DateTime<Utc>,
    pub http_status: HttpStatus,
    pub is_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<T>,
}

impl Response<()> {
    pub fn success() -> Self {
        Self::build(None)
    }
}

impl<T> Response<T> {
    pub fn success_of(body: T) -> Self {
        Self::build(Some(body))
    }

    fn build(response: Option<T>) -> Self {
        Self {
            time: Utc::now(),
            http_status: HttpStatus::Ok,
            is_success: true,
            response,
        }
    }
}

/// Wire form of a [`Page`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<R, F> {
    pub content: Vec<R>,
    pub page_number: u64,
    pub page_size: u64,
    pub total_page_count: u64,
    pub total_element_count: u64,
    pub sorted_by: Vec<Order>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filtered_by: Option<F>,
}

impl<R, F> PageResponse<R, F> {
    pub fn of<T>(page: Page<T, F>, map: impl FnMut(T) -> R) -> Self
    where
        F: Clone,
    {
        let page_number = page.page_number();
        let page_size = page.page_size();
        let total_page_count = page.total_page_count();
        let total_element_count = page.total_element_count();
        let sorted_by = page.sorted_by().to_vec();
        let filtered_by = page.filtered_by().cloned();

        Self {
            content: page.into_content().into_iter().map(map).collect(),
            page_number,
            page_size,
            total_page_count,
            total_element_count,
            sorted_by,
            filtered_by,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Page number, size and ordering as sent by the caller. A request without
/// one asks for the first page of default size.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingRequest {
    #[serde(default = "first_page")]
    pub page_number: u64,
    #[serde(default)]
    pub page_size: Option<u64>,
    #[serde(default)]
    pub orders: Vec<Order>,
}

fn first_page() -> u64 {
    1
}

impl Default for PagingRequest {
    fn default() -> Self {
        Self {
            page_number: first_page(),
            page_size: None,
            orders: Vec::new(),
        }
    }
}

impl PagingRequest {
    /// Applies the configured size bounds. A zero page number or size is a
    /// validation failure.
    pub fn to_pageable(&self, limits: &PagingLimits) -> DomainResult<Pageable> {
        let page_size = limits.resolve_page_size(self.page_size)?;
        Pageable::new(self.page_number, page_size, self.orders.clone())
    }
}

const NAME_LENGTH: core::ops::RangeInclusive<usize> = 2..=255;

fn validate_name(field: &str, name: &str) -> DomainResult<String> {
    let trimmed = name.trim();
    if !NAME_LENGTH.contains(&trimmed.chars().count()) {
        return Err(DomainError::validation(format!(
            "{field} must be between {} and {} characters",
            NAME_LENGTH.start(),
            NAME_LENGTH.end()
        )));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleListFilterRequest {
    #[serde(default)]
    pub institution_id: Option<InstitutionId>,
    #[serde(default)]
    pub statuses: Option<BTreeSet<RoleStatus>>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleListRequest {
    #[serde(default)]
    pub pageable: PagingRequest,
    #[serde(default)]
    pub filter: Option<RoleListFilterRequest>,
}

impl RoleListRequest {
    pub fn to_filter(&self) -> DomainResult<RoleFilter> {
        let Some(request) = &self.filter else {
            return Ok(RoleFilter::default());
        };
        if request.statuses.as_ref().is_some_and(BTreeSet::is_empty) {
            return Err(DomainError::validation("statuses must not be empty when given"));
        }

        let mut filter = RoleFilter {
            institution_id: request.institution_id,
            statuses: request.statuses.clone(),
            name: None,
        };
        if let Some(name) = &request.name {
            filter = filter.with_name(validate_name("name", name)?);
        }
        Ok(filter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCreateRequest {
    pub name: String,
    pub permission_ids: BTreeSet<PermissionId>,
}

impl RoleCreateRequest {
    pub fn to_command(&self) -> DomainResult<CreateRole> {
        Ok(CreateRole {
            name: validate_name("name", &self.name)?,
            permission_ids: self.permission_ids.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumberRequest {
    pub country_code: String,
    pub line_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentListFilterRequest {
    #[serde(default)]
    pub institution_id: Option<InstitutionId>,
    #[serde(default)]
    pub statuses: Option<BTreeSet<AssignmentStatus>>,
    #[serde(default)]
    pub phone_number: Option<PhoneNumberRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentListRequest {
    #[serde(default)]
    pub pageable: PagingRequest,
    #[serde(default)]
    pub filter: Option<AssignmentListFilterRequest>,
}

impl AssignmentListRequest {
    pub fn to_filter(&self) -> DomainResult<AssignmentFilter> {
        let Some(request) = &self.filter else {
            return Ok(AssignmentFilter::default());
        };

        let mut filter = AssignmentFilter {
            institution_id: request.institution_id,
            statuses: request.statuses.clone(),
            phone_number: None,
        };
        if let Some(phone) = &request.phone_number {
            filter = filter.with_phone_number(PhoneNumber::new(
                phone.country_code.trim(),
                phone.line_number.trim(),
            )?);
        }
        Ok(filter)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Response DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionResponse {
    pub id: PermissionId,
    pub name: String,
}

impl From<&Permission> for PermissionResponse {
    fn from(permission: &Permission) -> Self {
        Self {
            id: permission.id(),
            name: permission.name().to_string(),
        }
    }
}

/// A role with its permissions, for the detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub id: RoleId,
    pub name: String,
    pub status: RoleStatus,
    pub created_at: DateTime<Utc>,
    pub permissions: Vec<PermissionResponse>,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id(),
            name: role.name().to_string(),
            status: role.status(),
            created_at: role.created_at(),
            permissions: role.permissions().iter().map(PermissionResponse::from).collect(),
        }
    }
}

/// A role as a listing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolesResponse {
    pub id: RoleId,
    pub name: String,
    pub status: RoleStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Role> for RolesResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id(),
            name: role.name().to_string(),
            status: role.status(),
            created_at: role.created_at(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSummaryResponse {
    pub id: RoleId,
    pub name: String,
}

impl From<Role> for RoleSummaryResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id(),
            name: role.name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub id: AssignmentId,
    pub description: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: PhoneNumber,
    pub status: AssignmentStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Assignment> for AssignmentResponse {
    fn from(assignment: Assignment) -> Self {
        Self {
            id: assignment.id(),
            description: assignment.description().to_string(),
            first_name: assignment.first_name().to_string(),
            last_name: assignment.last_name().to_string(),
            phone_number: assignment.phone_number().clone(),
            status: assignment.status(),
            created_at: assignment.created_at(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionSummaryResponse {
    pub id: InstitutionId,
    pub name: String,
}

impl From<Institution> for InstitutionSummaryResponse {
    fn from(institution: Institution) -> Self {
        Self {
            id: institution.id(),
            name: institution.name().to_string(),
        }
    }
}
