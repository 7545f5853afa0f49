//! `ays-assignment`: institution-scoped assignments and their listing.

pub mod assignment;
pub mod port;
pub mod service;

pub use assignment::{Assignment, AssignmentDetails, AssignmentFilter, AssignmentStatus};
pub use port::AssignmentReadPort;
pub use service::AssignmentReadService;
