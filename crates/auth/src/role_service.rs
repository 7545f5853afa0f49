//! Role read, create and status-change services.
//!
//! Every operation runs inside the caller's institution; ids of roles that
//! belong to another institution behave exactly like unknown ids.

use chrono::Utc;
use tracing::{debug, info};

use ays_core::{DomainError, DomainResult, Page, Pageable, PermissionId, RoleId, found_or_not_exist};

use crate::port::{PermissionReadPort, RoleReadPort, RoleSavePort};
use crate::principal::Identity;
use crate::roles::{CreateRole, Role, RoleFilter};

// ─────────────────────────────────────────────────────────────────────────────
// Read
// ─────────────────────────────────────────────────────────────────────────────

pub struct RoleReadService<R> {
    roles: R,
}

impl<R> RoleReadService<R>
where
    R: RoleReadPort,
{
    pub fn new(roles: R) -> Self {
        Self { roles }
    }

    /// All roles of the caller's institution.
    pub fn find_all_unpaged(&self, identity: &Identity) -> DomainResult<Vec<Role>> {
        self.roles
            .find_all_by_institution_id(&identity.institution_id)
    }

    /// One page of the caller's roles narrowed by `filter`.
    pub fn find_all(
        &self,
        identity: &Identity,
        pageable: &Pageable,
        filter: RoleFilter,
    ) -> DomainResult<Page<Role, RoleFilter>> {
        let institution_id = identity.scope(filter.institution_id)?;
        pageable.ensure_sortable_by(Role::SORTABLE_PROPERTIES)?;

        let filter = filter.scoped_to(institution_id);
        let page = self.roles.find_all(pageable, &filter)?;
        debug!(
            %institution_id,
            page = page.page_number(),
            returned = page.content().len(),
            total = page.total_element_count(),
            "listed roles"
        );
        Ok(page)
    }

    pub fn find_by_id(&self, identity: &Identity, id: &RoleId) -> DomainResult<Role> {
        load_scoped(&self.roles, identity, id)
    }
}

fn load_scoped<R: RoleReadPort>(roles: &R, identity: &Identity, id: &RoleId) -> DomainResult<Role> {
    let found = roles.find_by_id_and_institution_id(id, &identity.institution_id)?;
    found_or_not_exist(found, || format!("role not exist! id:{id}"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Create
// ─────────────────────────────────────────────────────────────────────────────

pub struct RoleCreateService<R, S, P> {
    roles: R,
    save: S,
    permissions: P,
}

impl<R, S, P> RoleCreateService<R, S, P>
where
    R: RoleReadPort,
    S: RoleSavePort,
    P: PermissionReadPort,
{
    pub fn new(roles: R, save: S, permissions: P) -> Self {
        Self {
            roles,
            save,
            permissions,
        }
    }

    /// Creates an active role in the caller's institution.
    pub fn create(&self, identity: &Identity, command: CreateRole) -> DomainResult<()> {
        let institution_id = identity.institution_id;
        let name = command.name.trim().to_string();

        if command.permission_ids.is_empty() {
            return Err(DomainError::validation("role must grant at least one permission"));
        }
        if self
            .roles
            .exists_by_name_and_institution_id(&name, &institution_id)?
        {
            return Err(DomainError::already_exists(format!(
                "role already exist! name:{name}"
            )));
        }

        let ids: Vec<PermissionId> = command.permission_ids.iter().copied().collect();
        let permissions = self.permissions.find_all_by_ids(&ids)?;
        if let Some(missing) = ids
            .iter()
            .find(|id| !permissions.iter().any(|p| p.id() == **id))
        {
            return Err(DomainError::not_exist(format!(
                "permission not exist! id:{missing}"
            )));
        }

        let role = Role::create(institution_id, name, permissions, Utc::now())?;
        self.save.save(&role)?;
        info!(role_id = %role.id(), %institution_id, "role created");
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Status changes
// ─────────────────────────────────────────────────────────────────────────────

pub struct RoleUpdateService<R, S> {
    roles: R,
    save: S,
}

impl<R, S> RoleUpdateService<R, S>
where
    R: RoleReadPort,
    S: RoleSavePort,
{
    pub fn new(roles: R, save: S) -> Self {
        Self { roles, save }
    }

    pub fn activate(&self, identity: &Identity, id: &RoleId) -> DomainResult<()> {
        self.transition(identity, id, "activated", Role::activate)
    }

    pub fn passivate(&self, identity: &Identity, id: &RoleId) -> DomainResult<()> {
        self.transition(identity, id, "passivated", Role::passivate)
    }

    pub fn delete(&self, identity: &Identity, id: &RoleId) -> DomainResult<()> {
        self.transition(identity, id, "deleted", Role::delete)
    }

    fn transition(
        &self,
        identity: &Identity,
        id: &RoleId,
        outcome: &'static str,
        change: impl FnOnce(&mut Role) -> DomainResult<()>,
    ) -> DomainResult<()> {
        let mut role = load_scoped(&self.roles, identity, id)?;
        change(&mut role)?;
        self.save.save(&role)?;
        info!(role_id = %id, status = %role.status(), "role {outcome}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ays_core::{InstitutionId, ListPort, Order, ScopedReadPort, StoragePage, UserId};

    use super::*;
    use crate::permissions::Permission;
    use crate::roles::RoleStatus;

    #[derive(Default)]
    struct FakeRoles {
        roles: Mutex<Vec<Role>>,
        list_calls: AtomicUsize,
        last_filter: Mutex<Option<RoleFilter>>,
    }

    impl FakeRoles {
        fn with(roles: Vec<Role>) -> Self {
            Self {
                roles: Mutex::new(roles),
                ..Default::default()
            }
        }
    }

    impl ListPort<Role, RoleFilter> for FakeRoles {
        fn find_all(&self, pageable: &Pageable, filter: &RoleFilter) -> DomainResult<Page<Role, RoleFilter>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_filter.lock().unwrap() = Some(filter.clone());
            let matching: Vec<Role> = self
                .roles
                .lock()
                .unwrap()
                .iter()
                .filter(|r| filter.matches(r))
                .cloned()
                .collect();
            let raw = StoragePage::slice(matching, pageable);
            Page::of_filtered(filter.clone(), &raw, raw.content().to_vec())
        }
    }

    impl ScopedReadPort<Role, RoleId> for FakeRoles {
        fn find_by_id_and_institution_id(
            &self,
            id: &RoleId,
            institution_id: &InstitutionId,
        ) -> DomainResult<Option<Role>> {
            Ok(self
                .roles
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id() == *id && r.institution_id() == *institution_id)
                .cloned())
        }
    }

    impl RoleReadPort for FakeRoles {
        fn find_all_by_institution_id(&self, institution_id: &InstitutionId) -> DomainResult<Vec<Role>> {
            Ok(self
                .roles
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.institution_id() == *institution_id)
                .cloned()
                .collect())
        }

        fn exists_by_name_and_institution_id(
            &self,
            name: &str,
            institution_id: &InstitutionId,
        ) -> DomainResult<bool> {
            Ok(self
                .roles
                .lock()
                .unwrap()
                .iter()
                .any(|r| r.name() == name && r.institution_id() == *institution_id))
        }
    }

    #[derive(Default)]
    struct FakeSave {
        saved: Mutex<Vec<Role>>,
    }

    impl RoleSavePort for FakeSave {
        fn save(&self, role: &Role) -> DomainResult<()> {
            self.saved.lock().unwrap().push(role.clone());
            Ok(())
        }
    }

    struct FakePermissions(Vec<Permission>);

    impl PermissionReadPort for FakePermissions {
        fn find_all(&self) -> DomainResult<Vec<Permission>> {
            Ok(self.0.clone())
        }

        fn find_all_by_ids(&self, ids: &[PermissionId]) -> DomainResult<Vec<Permission>> {
            Ok(self.0.iter().filter(|p| ids.contains(&p.id())).cloned().collect())
        }
    }

    fn identity(institution_id: InstitutionId) -> Identity {
        Identity::new(UserId::new(), institution_id, ["role:list"])
    }

    fn permission(name: &str) -> Permission {
        Permission::new(PermissionId::new(), name).unwrap()
    }

    fn role(institution_id: InstitutionId, name: &str, status: RoleStatus) -> Role {
        Role::rehydrate(
            RoleId::new(),
            institution_id,
            name,
            status,
            vec![permission("role:list")],
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn listing_is_scoped_to_the_callers_institution() {
        let mine = InstitutionId::new();
        let theirs = InstitutionId::new();
        let roles = FakeRoles::with(vec![
            role(mine, "Admin", RoleStatus::Active),
            role(theirs, "Admin", RoleStatus::Active),
        ]);
        let service = RoleReadService::new(roles);

        let page = service
            .find_all(&identity(mine), &Pageable::first(10).unwrap(), RoleFilter::default())
            .unwrap();

        assert_eq!(page.total_element_count(), 1);
        assert_eq!(page.content()[0].institution_id(), mine);
        let seen = service.roles.last_filter.lock().unwrap().clone().unwrap();
        assert_eq!(seen.institution_id, Some(mine));
        assert_eq!(page.filtered_by(), Some(&seen));
    }

    #[test]
    fn foreign_institution_request_is_denied_before_the_port() {
        let service = RoleReadService::new(FakeRoles::default());
        let filter = RoleFilter::default().scoped_to(InstitutionId::new());

        let result = service.find_all(
            &identity(InstitutionId::new()),
            &Pageable::first(10).unwrap(),
            filter,
        );

        assert!(matches!(result, Err(DomainError::AuthorizationDenied(_))));
        assert_eq!(service.roles.list_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unknown_sort_property_is_rejected_before_the_port() {
        let service = RoleReadService::new(FakeRoles::default());
        let pageable = Pageable::new(1, 10, vec![Order::asc("permissions")]).unwrap();

        let result = service.find_all(&identity(InstitutionId::new()), &pageable, RoleFilter::default());

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(service.roles.list_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn foreign_role_by_id_does_not_exist() {
        let theirs = role(InstitutionId::new(), "Admin", RoleStatus::Active);
        let id = theirs.id();
        let service = RoleReadService::new(FakeRoles::with(vec![theirs]));

        let result = service.find_by_id(&identity(InstitutionId::new()), &id);

        assert!(matches!(result, Err(DomainError::NotExist(_))));
    }

    #[test]
    fn unpaged_listing_returns_only_own_roles() {
        let mine = InstitutionId::new();
        let service = RoleReadService::new(FakeRoles::with(vec![
            role(mine, "Admin", RoleStatus::Active),
            role(mine, "Volunteer", RoleStatus::Passive),
            role(InstitutionId::new(), "Admin", RoleStatus::Active),
        ]));

        assert_eq!(service.find_all_unpaged(&identity(mine)).unwrap().len(), 2);
    }

    fn create_service(
        roles: Vec<Role>,
        permissions: Vec<Permission>,
    ) -> RoleCreateService<FakeRoles, FakeSave, FakePermissions> {
        RoleCreateService::new(
            FakeRoles::with(roles),
            FakeSave::default(),
            FakePermissions(permissions),
        )
    }

    #[test]
    fn create_role_saves_an_active_role_in_callers_institution() {
        let mine = InstitutionId::new();
        let create = permission("role:create");
        let service = create_service(vec![], vec![create.clone(), permission("role:list")]);

        service
            .create(
                &identity(mine),
                CreateRole {
                    name: "Coordinator".to_string(),
                    permission_ids: BTreeSet::from([create.id()]),
                },
            )
            .unwrap();

        let saved = service.save.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].is_active());
        assert_eq!(saved[0].institution_id(), mine);
        assert_eq!(saved[0].name(), "Coordinator");
        assert_eq!(saved[0].permissions(), &[create]);
    }

    #[test]
    fn duplicate_name_in_same_institution_already_exists() {
        let mine = InstitutionId::new();
        let create = permission("role:create");
        let service = create_service(
            vec![role(mine, "Coordinator", RoleStatus::Active)],
            vec![create.clone()],
        );

        let result = service.create(
            &identity(mine),
            CreateRole {
                name: "Coordinator".to_string(),
                permission_ids: BTreeSet::from([create.id()]),
            },
        );

        assert!(matches!(result, Err(DomainError::AlreadyExists(_))));
        assert!(service.save.saved.lock().unwrap().is_empty());
    }

    #[test]
    fn same_name_in_another_institution_is_allowed() {
        let create = permission("role:create");
        let service = create_service(
            vec![role(InstitutionId::new(), "Coordinator", RoleStatus::Active)],
            vec![create.clone()],
        );

        let result = service.create(
            &identity(InstitutionId::new()),
            CreateRole {
                name: "Coordinator".to_string(),
                permission_ids: BTreeSet::from([create.id()]),
            },
        );

        assert!(result.is_ok());
    }

    #[test]
    fn unknown_permission_does_not_exist() {
        let service = create_service(vec![], vec![permission("role:create")]);

        let result = service.create(
            &identity(InstitutionId::new()),
            CreateRole {
                name: "Coordinator".to_string(),
                permission_ids: BTreeSet::from([PermissionId::new()]),
            },
        );

        assert!(matches!(result, Err(DomainError::NotExist(_))));
    }

    #[test]
    fn empty_permission_set_is_invalid() {
        let service = create_service(vec![], vec![]);

        let result = service.create(
            &identity(InstitutionId::new()),
            CreateRole {
                name: "Coordinator".to_string(),
                permission_ids: BTreeSet::new(),
            },
        );

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn status_changes_are_saved() {
        let mine = InstitutionId::new();
        let target = role(mine, "Admin", RoleStatus::Active);
        let id = target.id();
        let service = RoleUpdateService::new(FakeRoles::with(vec![target]), FakeSave::default());

        service.passivate(&identity(mine), &id).unwrap();

        let saved = service.save.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].status(), RoleStatus::Passive);
    }

    #[test]
    fn deleted_role_cannot_be_revived() {
        let mine = InstitutionId::new();
        let target = role(mine, "Admin", RoleStatus::Deleted);
        let id = target.id();
        let service = RoleUpdateService::new(FakeRoles::with(vec![target]), FakeSave::default());

        assert!(matches!(
            service.activate(&identity(mine), &id),
            Err(DomainError::Validation(_))
        ));
        assert!(service.save.saved.lock().unwrap().is_empty());
    }

    #[test]
    fn foreign_role_cannot_be_changed() {
        let target = role(InstitutionId::new(), "Admin", RoleStatus::Active);
        let id = target.id();
        let service = RoleUpdateService::new(FakeRoles::with(vec![target]), FakeSave::default());

        assert!(matches!(
            service.delete(&identity(InstitutionId::new()), &id),
            Err(DomainError::NotExist(_))
        ));
    }
}
