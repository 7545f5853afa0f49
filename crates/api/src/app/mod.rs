//! Application boundary, structured like:
//! - `services.rs`: wiring of the domain services to their adapters
//! - `routes/`: controllers, one file per resource
//! - `dto.rs`: request/response DTOs and mapping helpers
//! - `errors.rs`: consistent error responses

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// What a controller hands back to the transport layer.
pub type ApiResult<T> = Result<dto::Response<T>, errors::ErrorResponse>;
