//! Login endpoint. The only one reachable without claims.

use std::sync::Arc;

use ays_auth::{LoginRequest, Token};

use crate::app::ApiResult;
use crate::app::dto::Response;
use crate::app::services::AppServices;

pub struct AuthController {
    services: Arc<AppServices>,
}

impl AuthController {
    pub fn new(services: Arc<AppServices>) -> Self {
        Self { services }
    }

    /// POST /api/v1/authentication/token
    pub fn login(&self, request: &LoginRequest) -> ApiResult<Token> {
        let token = self.services.logins.login(request)?;
        Ok(Response::success_of(token))
    }
}
