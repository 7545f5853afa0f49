//! Assignment endpoints.

use std::sync::Arc;

use ays_assignment::AssignmentFilter;
use ays_auth::{Claims, permission_names};
use ays_core::AssignmentId;

use crate::app::ApiResult;
use crate::app::dto::{AssignmentListRequest, AssignmentResponse, PageResponse, Response};
use crate::app::services::AppServices;
use crate::authz;

pub struct AssignmentController {
    services: Arc<AppServices>,
}

impl AssignmentController {
    pub fn new(services: Arc<AppServices>) -> Self {
        Self { services }
    }

    /// POST /api/v1/assignments
    pub fn list(
        &self,
        claims: &Claims,
        request: &AssignmentListRequest,
    ) -> ApiResult<PageResponse<AssignmentResponse, AssignmentFilter>> {
        let identity = authz::require(claims, permission_names::ASSIGNMENT_LIST)?;
        let pageable = request.pageable.to_pageable(&self.services.config.paging)?;
        let page = self
            .services
            .assignments
            .find_all(&identity, &pageable, request.to_filter()?)?;
        Ok(Response::success_of(PageResponse::of(page, AssignmentResponse::from)))
    }

    /// GET /api/v1/assignment/{id}
    pub fn get(&self, claims: &Claims, id: &str) -> ApiResult<AssignmentResponse> {
        let identity = authz::require(claims, permission_names::ASSIGNMENT_DETAIL)?;
        let assignment = self
            .services
            .assignments
            .find_by_id(&identity, &id.parse::<AssignmentId>()?)?;
        Ok(Response::success_of(AssignmentResponse::from(assignment)))
    }
}
