//! Capabilities the domain consumes from storage collaborators.
//!
//! Ports are synchronous and storage-agnostic; adapters decide whether the
//! storage behind them is local or remote.

use std::sync::Arc;

use crate::error::{DomainError, DomainResult};
use crate::id::InstitutionId;
use crate::paging::{Filter, Page, Pageable};

/// Filtered, paged listing of `T`.
///
/// Unpaged listings are not part of this trait. They live on the ports that
/// need them, such as `RoleReadPort::find_all_by_institution_id` and
/// `InstitutionReadPort::find_all_by_status_order_by_name_asc`, each with the
/// fixed scope or order its callers rely on.
pub trait ListPort<T, F: Filter>: Send + Sync {
    fn find_all(&self, pageable: &Pageable, filter: &F) -> DomainResult<Page<T, F>>;
}

/// Lookup by id confined to one institution.
///
/// A record that exists in another institution is indistinguishable from a
/// missing one: both yield `Ok(None)`.
pub trait ScopedReadPort<T, Id>: Send + Sync {
    fn find_by_id_and_institution_id(
        &self,
        id: &Id,
        institution_id: &InstitutionId,
    ) -> DomainResult<Option<T>>;
}

impl<T, F, P> ListPort<T, F> for Arc<P>
where
    F: Filter,
    P: ListPort<T, F> + ?Sized,
{
    fn find_all(&self, pageable: &Pageable, filter: &F) -> DomainResult<Page<T, F>> {
        (**self).find_all(pageable, filter)
    }
}

impl<T, Id, P> ScopedReadPort<T, Id> for Arc<P>
where
    P: ScopedReadPort<T, Id> + ?Sized,
{
    fn find_by_id_and_institution_id(
        &self,
        id: &Id,
        institution_id: &InstitutionId,
    ) -> DomainResult<Option<T>> {
        (**self).find_by_id_and_institution_id(id, institution_id)
    }
}

/// Turns an absent lookup result into a `NotExist` failure.
pub fn found_or_not_exist<T>(found: Option<T>, describe: impl FnOnce() -> String) -> DomainResult<T> {
    found.ok_or_else(|| DomainError::not_exist(describe()))
}
