use tracing::debug;

use ays_auth::Identity;
use ays_core::{AssignmentId, DomainResult, Page, Pageable, found_or_not_exist};

use crate::assignment::{Assignment, AssignmentFilter};
use crate::port::AssignmentReadPort;

pub struct AssignmentReadService<P> {
    assignments: P,
}

impl<P> AssignmentReadService<P>
where
    P: AssignmentReadPort,
{
    pub fn new(assignments: P) -> Self {
        Self { assignments }
    }

    /// One page of the caller's assignments narrowed by `filter`.
    pub fn find_all(
        &self,
        identity: &Identity,
        pageable: &Pageable,
        filter: AssignmentFilter,
    ) -> DomainResult<Page<Assignment, AssignmentFilter>> {
        let institution_id = identity.scope(filter.institution_id)?;
        pageable.ensure_sortable_by(Assignment::SORTABLE_PROPERTIES)?;

        let page = self
            .assignments
            .find_all(pageable, &filter.scoped_to(institution_id))?;
        debug!(
            %institution_id,
            page = page.page_number(),
            total = page.total_element_count(),
            "listed assignments"
        );
        Ok(page)
    }

    pub fn find_by_id(&self, identity: &Identity, id: &AssignmentId) -> DomainResult<Assignment> {
        let found = self
            .assignments
            .find_by_id_and_institution_id(id, &identity.institution_id)?;
        found_or_not_exist(found, || format!("assignment not exist! id:{id}"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ays_core::{
        DomainError, InstitutionId, ListPort, Order, PhoneNumber, ScopedReadPort, StoragePage,
        UserId,
    };

    use super::*;
    use crate::assignment::AssignmentStatus;
    use crate::assignment::fixtures::assignment;

    struct FakeAssignments {
        rows: Vec<Assignment>,
        calls: AtomicUsize,
    }

    impl FakeAssignments {
        fn with(rows: Vec<Assignment>) -> Self {
            Self {
                rows,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ListPort<Assignment, AssignmentFilter> for FakeAssignments {
        fn find_all(
            &self,
            pageable: &Pageable,
            filter: &AssignmentFilter,
        ) -> DomainResult<Page<Assignment, AssignmentFilter>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let matching: Vec<_> = self.rows.iter().filter(|a| filter.matches(a)).cloned().collect();
            let raw = StoragePage::slice(matching, pageable);
            Page::of_filtered(filter.clone(), &raw, raw.content().to_vec())
        }
    }

    impl ScopedReadPort<Assignment, AssignmentId> for FakeAssignments {
        fn find_by_id_and_institution_id(
            &self,
            id: &AssignmentId,
            institution_id: &InstitutionId,
        ) -> DomainResult<Option<Assignment>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .rows
                .iter()
                .find(|a| a.id() == *id && a.institution_id() == *institution_id)
                .cloned())
        }
    }

    fn identity(institution_id: InstitutionId) -> Identity {
        Identity::new(UserId::new(), institution_id, ["assignment:list"])
    }

    #[test]
    fn listing_combines_scope_with_present_filters() {
        let mine = InstitutionId::new();
        let service = AssignmentReadService::new(FakeAssignments::with(vec![
            assignment(mine, AssignmentStatus::Available, "5550000001"),
            assignment(mine, AssignmentStatus::Done, "5550000001"),
            assignment(mine, AssignmentStatus::Available, "5550000002"),
            assignment(InstitutionId::new(), AssignmentStatus::Available, "5550000001"),
        ]));
        let filter = AssignmentFilter::default()
            .with_statuses([AssignmentStatus::Available])
            .with_phone_number(PhoneNumber::new("90", "5550000001").unwrap());

        let page = service
            .find_all(&identity(mine), &Pageable::first(10).unwrap(), filter)
            .unwrap();

        assert_eq!(page.total_element_count(), 1);
        assert_eq!(page.content()[0].status(), AssignmentStatus::Available);
        assert_eq!(page.content()[0].institution_id(), mine);
    }

    #[test]
    fn unfiltered_listing_returns_every_own_assignment() {
        let mine = InstitutionId::new();
        let service = AssignmentReadService::new(FakeAssignments::with(vec![
            assignment(mine, AssignmentStatus::Available, "5550000001"),
            assignment(mine, AssignmentStatus::Done, "5550000002"),
        ]));

        let page = service
            .find_all(&identity(mine), &Pageable::first(1).unwrap(), AssignmentFilter::default())
            .unwrap();

        assert_eq!(page.content().len(), 1);
        assert_eq!(page.total_element_count(), 2);
        assert_eq!(page.total_page_count(), 2);
    }

    #[test]
    fn foreign_institution_filter_is_denied() {
        let service = AssignmentReadService::new(FakeAssignments::with(vec![]));
        let filter = AssignmentFilter::default().scoped_to(InstitutionId::new());

        let result = service.find_all(
            &identity(InstitutionId::new()),
            &Pageable::first(10).unwrap(),
            filter,
        );

        assert!(matches!(result, Err(DomainError::AuthorizationDenied(_))));
        assert_eq!(service.assignments.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn sorting_by_unknown_property_is_invalid() {
        let service = AssignmentReadService::new(FakeAssignments::with(vec![]));
        let pageable = Pageable::new(1, 10, vec![Order::desc("firstName")]).unwrap();

        let result = service.find_all(
            &identity(InstitutionId::new()),
            &pageable,
            AssignmentFilter::default(),
        );

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn assignment_of_another_institution_does_not_exist() {
        let theirs = assignment(InstitutionId::new(), AssignmentStatus::Reserved, "5550000001");
        let id = theirs.id();
        let service = AssignmentReadService::new(FakeAssignments::with(vec![theirs.clone()]));

        let result = service.find_by_id(&identity(InstitutionId::new()), &id);
        assert!(matches!(result, Err(DomainError::NotExist(_))));

        let owner = identity(theirs.institution_id());
        assert_eq!(service.find_by_id(&owner, &id).unwrap(), theirs);
    }
}
