use std::sync::Arc;

use ays_core::{DomainResult, InstitutionId};

use crate::institution::{Institution, InstitutionStatus};

/// Read access to institutions held by the storage collaborator.
pub trait InstitutionReadPort: Send + Sync {
    fn find_by_id(&self, id: &InstitutionId) -> DomainResult<Option<Institution>>;

    /// Institutions in `status`, ordered by name ascending.
    fn find_all_by_status_order_by_name_asc(
        &self,
        status: InstitutionStatus,
    ) -> DomainResult<Vec<Institution>>;
}

impl<P> InstitutionReadPort for Arc<P>
where
    P: InstitutionReadPort + ?Sized,
{
    fn find_by_id(&self, id: &InstitutionId) -> DomainResult<Option<Institution>> {
        (**self).find_by_id(id)
    }

    fn find_all_by_status_order_by_name_asc(
        &self,
        status: InstitutionStatus,
    ) -> DomainResult<Vec<Institution>> {
        (**self).find_all_by_status_order_by_name_asc(status)
    }
}
