//! Filtered pagination: request side ([`Pageable`], [`Filter`]) and response
//! side ([`Page`]), plus the storage-facing pieces ([`Specification`],
//! [`StoragePage`], [`Sortable`]) adapters use to honour them.

pub mod filter;
pub mod limits;
pub mod page;
pub mod pageable;
pub mod sort;

pub use filter::{Filter, Specification};
pub use limits::PagingLimits;
pub use page::{Page, StoragePage};
pub use pageable::{Direction, Order, Pageable};
pub use sort::{Sortable, sort_stable};
