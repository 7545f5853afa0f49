//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Business failures (`Validation`, `AlreadyExists`, `NotExist`,
/// `AuthorizationDenied`, `Unauthenticated`) are recovered at the boundary into
/// user-safe responses. `PreconditionViolation` and `StorageFailure` are
/// unexpected: they propagate to the top-level handler, which must not leak
/// their detail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A uniqueness constraint would be violated (e.g. duplicate role name).
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// A lookup by id missed.
    #[error("not exist: {0}")]
    NotExist(String),

    /// An internal contract was breached by the caller. Programming error.
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),

    /// The caller is not allowed to touch the requested resource or action.
    #[error("authorization denied: {0}")]
    AuthorizationDenied(String),

    /// Credentials could not be verified.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// The storage collaborator failed (distinct from an absent record).
    #[error("storage failure: {0}")]
    StorageFailure(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    pub fn not_exist(msg: impl Into<String>) -> Self {
        Self::NotExist(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::PreconditionViolation(msg.into())
    }

    pub fn denied(msg: impl Into<String>) -> Self {
        Self::AuthorizationDenied(msg.into())
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageFailure(msg.into())
    }

    /// Whether this failure is a business outcome the boundary may show to
    /// the caller, as opposed to an internal fault.
    pub fn is_domain_failure(&self) -> bool {
        !matches!(
            self,
            Self::PreconditionViolation(_) | Self::StorageFailure(_)
        )
    }
}
