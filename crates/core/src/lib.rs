//! `ays-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! typed ids, the error model, entity/value-object traits, the filtered
//! pagination abstraction and the generic listing ports.

pub mod entity;
pub mod error;
pub mod id;
pub mod paging;
pub mod port;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AssignmentId, InstitutionId, PermissionId, RoleId, UserId};
pub use paging::{
    Direction, Filter, Order, Page, Pageable, PagingLimits, Sortable, Specification, StoragePage,
    sort_stable,
};
pub use port::{ListPort, ScopedReadPort, found_or_not_exist};
pub use value_object::{PhoneNumber, ValueObject};
