//! Institution endpoints.

use std::sync::Arc;

use ays_auth::{Claims, permission_names};

use crate::app::ApiResult;
use crate::app::dto::{InstitutionSummaryResponse, Response};
use crate::app::services::AppServices;
use crate::authz;

pub struct InstitutionController {
    services: Arc<AppServices>,
}

impl InstitutionController {
    pub fn new(services: Arc<AppServices>) -> Self {
        Self { services }
    }

    /// GET /api/v1/institutions/summary
    pub fn summaries(&self, claims: &Claims) -> ApiResult<Vec<InstitutionSummaryResponse>> {
        authz::require(claims, permission_names::INSTITUTION_SUMMARY)?;
        let institutions = self.services.institutions.summaries()?;
        Ok(Response::success_of(
            institutions
                .into_iter()
                .map(InstitutionSummaryResponse::from)
                .collect(),
        ))
    }
}
