//! In-memory storage collaborator: tables, row mapping and the port adapters.

pub mod assignment;
pub mod institution;
pub mod mapper;
pub mod role;
pub mod rows;
pub mod store;
pub mod user;

use std::sync::Arc;

use ays_assignment::Assignment;
use ays_auth::{Permission, User, UserSavePort, permission_names};
use ays_core::{
    DomainError, DomainResult, Filter, InstitutionId, Page, Pageable, PermissionId, Sortable,
    Specification, StoragePage, sort_stable,
};
use ays_institution::Institution;

use self::mapper::{institution_to_row, permission_to_row};

pub use self::assignment::AssignmentAdapter;
pub use self::institution::InstitutionAdapter;
pub use self::role::{PermissionAdapter, RoleAdapter};
pub use self::rows::{AssignmentRow, InstitutionRow, PermissionRow, RoleRow, UserRow};
pub use self::store::{InMemoryTable, Row, RowStore, StoreError};
pub use self::user::UserAdapter;

/// Every table of the in-memory storage. Cloning shares the tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    pub institutions: Arc<InMemoryTable<InstitutionRow>>,
    pub permissions: Arc<InMemoryTable<PermissionRow>>,
    pub roles: Arc<InMemoryTable<RoleRow>>,
    pub users: Arc<InMemoryTable<UserRow>>,
    pub assignments: Arc<InMemoryTable<AssignmentRow>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn institution_adapter(&self) -> InstitutionAdapter {
        InstitutionAdapter::new(self.institutions.clone())
    }

    pub fn permission_adapter(&self) -> PermissionAdapter {
        PermissionAdapter::new(self.permissions.clone())
    }

    pub fn role_adapter(&self) -> RoleAdapter {
        RoleAdapter::new(self.roles.clone(), self.permissions.clone())
    }

    pub fn user_adapter(&self) -> UserAdapter {
        UserAdapter::new(
            self.users.clone(),
            self.role_adapter(),
            self.institution_adapter(),
        )
    }

    pub fn assignment_adapter(&self) -> AssignmentAdapter {
        AssignmentAdapter::new(self.assignments.clone())
    }

    // Seeding. Institutions, permissions, users and assignments have no
    // write path of their own.

    pub fn insert_institution(&self, institution: &Institution) -> DomainResult<()> {
        Ok(self.institutions.upsert(institution_to_row(institution))?)
    }

    pub fn insert_permission(&self, permission: &Permission) -> DomainResult<()> {
        Ok(self.permissions.upsert(permission_to_row(permission))?)
    }

    /// One permission per name the boundary checks.
    pub fn seed_permissions(&self) -> DomainResult<Vec<Permission>> {
        permission_names::ALL
            .iter()
            .map(|name| {
                let permission = Permission::new(PermissionId::new(), *name)?;
                self.insert_permission(&permission)?;
                Ok(permission)
            })
            .collect()
    }

    pub fn insert_user(&self, user: &User) -> DomainResult<()> {
        self.user_adapter().save(user)
    }

    pub fn insert_assignment(&self, assignment: &Assignment) -> DomainResult<()> {
        self.assignment_adapter().save(assignment)
    }
}

/// Institution an institution-scoped listing runs against.
///
/// The services always scope the filter; an unscoped one reaching storage is
/// a caller bug.
pub(crate) fn required_scope<F: Filter>(filter: &F) -> DomainResult<InstitutionId> {
    filter.institution_id().ok_or_else(|| {
        DomainError::precondition("institution-scoped listing requested without an institution")
    })
}

/// Select → sort → cut → map, the listing pipeline shared by the adapters.
pub(crate) fn list_page<R, T, F>(
    table: &impl RowStore<R>,
    spec: Specification<R>,
    pageable: &Pageable,
    filter: &F,
    map: impl Fn(&R) -> Result<T, StoreError>,
) -> DomainResult<Page<T, F>>
where
    R: Row + Sortable,
    F: Filter,
{
    let mut rows = table.select(&spec)?;
    sort_stable(&mut rows, pageable.orders())?;

    let raw = StoragePage::slice(rows, pageable);
    let content = raw
        .content()
        .iter()
        .map(map)
        .collect::<Result<Vec<_>, _>>()?;
    Page::of_filtered(filter.clone(), &raw, content)
}
