use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use ays_assignment::{Assignment, AssignmentFilter};
use ays_core::{
    AssignmentId, DomainResult, InstitutionId, ListPort, Page, Pageable, ScopedReadPort,
    Specification,
};

use super::mapper::{assignment_from_row, assignment_to_row};
use super::rows::AssignmentRow;
use super::store::{InMemoryTable, RowStore};
use super::{list_page, required_scope};

#[derive(Debug, Clone)]
pub struct AssignmentAdapter {
    assignments: Arc<InMemoryTable<AssignmentRow>>,
}

impl AssignmentAdapter {
    pub fn new(assignments: Arc<InMemoryTable<AssignmentRow>>) -> Self {
        Self { assignments }
    }

    pub fn save(&self, assignment: &Assignment) -> DomainResult<()> {
        self.assignments.upsert(assignment_to_row(assignment))?;
        Ok(())
    }
}

fn specification(
    filter: &AssignmentFilter,
    institution_id: InstitutionId,
) -> Specification<AssignmentRow> {
    let statuses = filter.statuses.as_ref().map(|statuses| {
        statuses
            .iter()
            .map(|s| s.as_str().to_string())
            .collect::<BTreeSet<_>>()
    });
    let phone = filter
        .phone_number
        .as_ref()
        .map(|p| (p.country_code().to_string(), p.line_number().to_string()));

    Specification::all()
        .and(move |row: &AssignmentRow| row.institution_id == institution_id)
        .and_if_present(statuses, |row: &AssignmentRow, statuses| {
            statuses.contains(&row.status)
        })
        .and_if_present(phone, |row: &AssignmentRow, (country_code, line_number)| {
            row.phone_country_code == *country_code && row.phone_line_number == *line_number
        })
}

impl ListPort<Assignment, AssignmentFilter> for AssignmentAdapter {
    fn find_all(
        &self,
        pageable: &Pageable,
        filter: &AssignmentFilter,
    ) -> DomainResult<Page<Assignment, AssignmentFilter>> {
        let institution_id = required_scope(filter)?;
        let spec = specification(filter, institution_id);
        debug!(%institution_id, predicates = spec.predicate_count(), "selecting assignments");
        list_page(&self.assignments, spec, pageable, filter, assignment_from_row)
    }
}

impl ScopedReadPort<Assignment, AssignmentId> for AssignmentAdapter {
    fn find_by_id_and_institution_id(
        &self,
        id: &AssignmentId,
        institution_id: &InstitutionId,
    ) -> DomainResult<Option<Assignment>> {
        match self.assignments.get(id)? {
            Some(row) if row.institution_id == *institution_id => Ok(Some(assignment_from_row(&row)?)),
            _ => Ok(None),
        }
    }
}
