//! Web boundary: request validation, response envelopes, error mapping and
//! the controllers that sit in front of the domain services.
//!
//! No HTTP framework is wired in. A transport layer verifies the bearer
//! token, hands the resulting [`Claims`](ays_auth::Claims) plus the decoded
//! request body to a controller, and writes back whatever it returns.

pub mod app;
pub mod authz;

pub use app::services::{AppServices, bootstrap};
