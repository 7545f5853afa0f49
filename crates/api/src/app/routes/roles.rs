//! Role endpoints.

use std::sync::Arc;

use ays_auth::{Claims, RoleFilter, permission_names};
use ays_core::RoleId;

use crate::app::ApiResult;
use crate::app::dto::{
    PageResponse, Response, RoleCreateRequest, RoleListRequest, RoleResponse, RoleSummaryResponse,
    RolesResponse,
};
use crate::app::services::AppServices;
use crate::authz;

pub struct RoleController {
    services: Arc<AppServices>,
}

impl RoleController {
    pub fn new(services: Arc<AppServices>) -> Self {
        Self { services }
    }

    /// POST /api/v1/role
    pub fn create(&self, claims: &Claims, request: &RoleCreateRequest) -> ApiResult<()> {
        let identity = authz::require(claims, permission_names::ROLE_CREATE)?;
        self.services
            .role_creates
            .create(&identity, request.to_command()?)?;
        Ok(Response::success())
    }

    /// GET /api/v1/roles/summary
    pub fn summary(&self, claims: &Claims) -> ApiResult<Vec<RoleSummaryResponse>> {
        let identity = authz::require(claims, permission_names::ROLE_LIST)?;
        let roles = self.services.role_reads.find_all_unpaged(&identity)?;
        Ok(Response::success_of(
            roles.into_iter().map(RoleSummaryResponse::from).collect(),
        ))
    }

    /// POST /api/v1/roles
    pub fn list(
        &self,
        claims: &Claims,
        request: &RoleListRequest,
    ) -> ApiResult<PageResponse<RolesResponse, RoleFilter>> {
        let identity = authz::require(claims, permission_names::ROLE_LIST)?;
        let pageable = request.pageable.to_pageable(&self.services.config.paging)?;
        let page = self
            .services
            .role_reads
            .find_all(&identity, &pageable, request.to_filter()?)?;
        Ok(Response::success_of(PageResponse::of(page, RolesResponse::from)))
    }

    /// GET /api/v1/role/{id}
    pub fn get(&self, claims: &Claims, id: &str) -> ApiResult<RoleResponse> {
        let identity = authz::require(claims, permission_names::ROLE_DETAIL)?;
        let role = self.services.role_reads.find_by_id(&identity, &id.parse::<RoleId>()?)?;
        Ok(Response::success_of(RoleResponse::from(role)))
    }

    /// PATCH /api/v1/role/{id}/activate
    pub fn activate(&self, claims: &Claims, id: &str) -> ApiResult<()> {
        let identity = authz::require(claims, permission_names::ROLE_UPDATE)?;
        self.services.role_updates.activate(&identity, &id.parse::<RoleId>()?)?;
        Ok(Response::success())
    }

    /// PATCH /api/v1/role/{id}/passivate
    pub fn passivate(&self, claims: &Claims, id: &str) -> ApiResult<()> {
        let identity = authz::require(claims, permission_names::ROLE_UPDATE)?;
        self.services.role_updates.passivate(&identity, &id.parse::<RoleId>()?)?;
        Ok(Response::success())
    }

    /// DELETE /api/v1/role/{id}
    pub fn delete(&self, claims: &Claims, id: &str) -> ApiResult<()> {
        let identity = authz::require(claims, permission_names::ROLE_DELETE)?;
        self.services.role_updates.delete(&identity, &id.parse::<RoleId>()?)?;
        Ok(Response::success())
    }
}
