//! Consistent error responses.
//!
//! Business failures keep their message; internal faults are logged and
//! answered with a generic body that carries none of their detail.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, warn};

use ays_core::DomainError;

/// Status line of a response, named the way it appears in the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HttpStatus {
    Ok,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    InternalServerError,
}

impl HttpStatus {
    pub fn code(&self) -> u16 {
        match self {
            HttpStatus::Ok => 200,
            HttpStatus::BadRequest => 400,
            HttpStatus::Unauthorized => 401,
            HttpStatus::Forbidden => 403,
            HttpStatus::NotFound => 404,
            HttpStatus::Conflict => 409,
            HttpStatus::InternalServerError => 500,
        }
    }
}

pub mod headers {
    pub const VALIDATION_ERROR: &str = "VALIDATION ERROR";
    pub const AUTH_ERROR: &str = "AUTH ERROR";
    pub const NOT_EXIST: &str = "NOT EXIST";
    pub const ALREADY_EXIST: &str = "ALREADY EXIST";
    pub const PROCESS_ERROR: &str = "PROCESS ERROR";
}

const GENERIC_FAILURE: &str = "an unexpected error occurred, please try again later";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub time: DateTime<Utc>,
    pub http_status: HttpStatus,
    pub header: &'static str,
    pub message: String,
    pub is_success: bool,
}

impl ErrorResponse {
    pub fn new(http_status: HttpStatus, header: &'static str, message: impl Into<String>) -> Self {
        Self {
            time: Utc::now(),
            http_status,
            header,
            message: message.into(),
            is_success: false,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.http_status.code()
    }
}

impl From<DomainError> for ErrorResponse {
    fn from(err: DomainError) -> Self {
        let (status, header) = match &err {
            DomainError::Validation(_) | DomainError::InvalidId(_) => {
                (HttpStatus::BadRequest, headers::VALIDATION_ERROR)
            }
            DomainError::Unauthenticated(_) => (HttpStatus::Unauthorized, headers::AUTH_ERROR),
            DomainError::AuthorizationDenied(_) => (HttpStatus::Forbidden, headers::AUTH_ERROR),
            DomainError::NotExist(_) => (HttpStatus::NotFound, headers::NOT_EXIST),
            DomainError::AlreadyExists(_) => (HttpStatus::Conflict, headers::ALREADY_EXIST),
            DomainError::PreconditionViolation(_) | DomainError::StorageFailure(_) => {
                error!(error = %err, "request failed unexpectedly");
                return Self::new(
                    HttpStatus::InternalServerError,
                    headers::PROCESS_ERROR,
                    GENERIC_FAILURE,
                );
            }
        };

        match status {
            HttpStatus::Unauthorized | HttpStatus::Forbidden => warn!(error = %err, "request rejected"),
            _ => debug!(error = %err, "request failed"),
        }
        Self::new(status, header, message_of(err))
    }
}

/// The message the failure was raised with, without the variant prefix.
fn message_of(err: DomainError) -> String {
    match err {
        DomainError::Validation(msg)
        | DomainError::InvalidId(msg)
        | DomainError::AlreadyExists(msg)
        | DomainError::NotExist(msg)
        | DomainError::PreconditionViolation(msg)
        | DomainError::AuthorizationDenied(msg)
        | DomainError::Unauthenticated(msg)
        | DomainError::StorageFailure(msg) => msg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_failures_keep_their_message() {
        let response = ErrorResponse::from(DomainError::already_exists("role already exist! name:Admin"));

        assert_eq!(response.status_code(), 409);
        assert_eq!(response.header, headers::ALREADY_EXIST);
        assert_eq!(response.message, "role already exist! name:Admin");
        assert!(!response.is_success);
    }

    #[test]
    fn each_failure_kind_has_its_status() {
        let cases = [
            (DomainError::validation("x"), 400, headers::VALIDATION_ERROR),
            (DomainError::invalid_id("x"), 400, headers::VALIDATION_ERROR),
            (DomainError::unauthenticated("x"), 401, headers::AUTH_ERROR),
            (DomainError::denied("x"), 403, headers::AUTH_ERROR),
            (DomainError::not_exist("x"), 404, headers::NOT_EXIST),
            (DomainError::already_exists("x"), 409, headers::ALREADY_EXIST),
        ];
        for (err, code, header) in cases {
            let response = ErrorResponse::from(err);
            assert_eq!(response.status_code(), code);
            assert_eq!(response.header, header);
        }
    }

    #[test]
    fn internal_faults_do_not_leak_detail() {
        for err in [
            DomainError::storage("role table lock poisoned"),
            DomainError::precondition("institution missing"),
        ] {
            let response = ErrorResponse::from(err);
            assert_eq!(response.status_code(), 500);
            assert_eq!(response.header, headers::PROCESS_ERROR);
            assert_eq!(response.message, GENERIC_FAILURE);
        }
    }

    #[test]
    fn body_uses_camel_case_and_status_names() {
        let json = serde_json::to_value(ErrorResponse::from(DomainError::denied("x"))).unwrap();
        assert_eq!(json["httpStatus"], "FORBIDDEN");
        assert_eq!(json["isSuccess"], false);
        assert!(json.get("time").is_some());
    }
}
