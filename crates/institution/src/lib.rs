//! `ays-institution`: the institution (tenant) reference entity.

pub mod institution;
pub mod port;
pub mod service;

pub use institution::{Institution, InstitutionStatus};
pub use port::InstitutionReadPort;
pub use service::InstitutionService;
