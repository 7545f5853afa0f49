use std::sync::Arc;

use ays_core::{DomainResult, InstitutionId, Specification};
use ays_institution::{Institution, InstitutionReadPort, InstitutionStatus};

use super::mapper::institution_from_row;
use super::rows::InstitutionRow;
use super::store::{InMemoryTable, RowStore};

#[derive(Debug, Clone)]
pub struct InstitutionAdapter {
    institutions: Arc<InMemoryTable<InstitutionRow>>,
}

impl InstitutionAdapter {
    pub fn new(institutions: Arc<InMemoryTable<InstitutionRow>>) -> Self {
        Self { institutions }
    }
}

impl InstitutionReadPort for InstitutionAdapter {
    fn find_by_id(&self, id: &InstitutionId) -> DomainResult<Option<Institution>> {
        Ok(self
            .institutions
            .get(id)?
            .as_ref()
            .map(institution_from_row)
            .transpose()?)
    }

    fn find_all_by_status_order_by_name_asc(
        &self,
        status: InstitutionStatus,
    ) -> DomainResult<Vec<Institution>> {
        let wanted = status.to_string();
        let mut rows = self
            .institutions
            .select(&Specification::all().and(move |row: &InstitutionRow| row.status == wanted))?;
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows
            .iter()
            .map(institution_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }
}
