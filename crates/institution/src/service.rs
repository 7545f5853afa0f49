use tracing::debug;

use ays_core::DomainResult;

use crate::institution::{Institution, InstitutionStatus};
use crate::port::InstitutionReadPort;

/// Read-side institution operations.
pub struct InstitutionService<P> {
    port: P,
}

impl<P> InstitutionService<P>
where
    P: InstitutionReadPort,
{
    pub fn new(port: P) -> Self {
        Self { port }
    }

    /// Active institutions, ordered by name ascending. Unpaged.
    pub fn summaries(&self) -> DomainResult<Vec<Institution>> {
        let institutions = self
            .port
            .find_all_by_status_order_by_name_asc(InstitutionStatus::Active)?;
        debug!(count = institutions.len(), "listed active institutions");
        Ok(institutions)
    }
}
