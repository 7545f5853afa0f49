use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use ays_auth::{
    Permission, PermissionReadPort, Role, RoleFilter, RoleReadPort, RoleSavePort,
};
use ays_core::{
    DomainResult, InstitutionId, ListPort, Page, Pageable, PermissionId, RoleId, ScopedReadPort,
    Specification,
};

use super::mapper::{permission_from_row, role_from_row, role_to_row};
use super::rows::{PermissionRow, RoleRow};
use super::store::{InMemoryTable, RowStore, StoreError};
use super::{list_page, required_scope};

// ─────────────────────────────────────────────────────────────────────────────
// Permissions
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PermissionAdapter {
    permissions: Arc<InMemoryTable<PermissionRow>>,
}

impl PermissionAdapter {
    pub fn new(permissions: Arc<InMemoryTable<PermissionRow>>) -> Self {
        Self { permissions }
    }
}

impl PermissionReadPort for PermissionAdapter {
    fn find_all(&self) -> DomainResult<Vec<Permission>> {
        let rows = self.permissions.select(&Specification::all())?;
        Ok(rows
            .iter()
            .map(permission_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    fn find_all_by_ids(&self, ids: &[PermissionId]) -> DomainResult<Vec<Permission>> {
        let wanted: BTreeSet<PermissionId> = ids.iter().copied().collect();
        let rows = self
            .permissions
            .select(&Specification::all().and(move |row: &PermissionRow| wanted.contains(&row.id)))?;
        Ok(rows
            .iter()
            .map(permission_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Roles
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RoleAdapter {
    roles: Arc<InMemoryTable<RoleRow>>,
    permissions: Arc<InMemoryTable<PermissionRow>>,
}

impl RoleAdapter {
    pub fn new(
        roles: Arc<InMemoryTable<RoleRow>>,
        permissions: Arc<InMemoryTable<PermissionRow>>,
    ) -> Self {
        Self { roles, permissions }
    }

    fn map(&self, row: &RoleRow) -> Result<Role, StoreError> {
        let wanted: BTreeSet<PermissionId> = row.permission_ids.iter().copied().collect();
        let permissions = self
            .permissions
            .select(&Specification::all().and(move |p: &PermissionRow| wanted.contains(&p.id)))?;
        role_from_row(row, &permissions)
    }

    /// Roles whose ids are in `ids`, skipping unknown ones.
    pub(crate) fn find_all_by_ids(&self, ids: &[RoleId]) -> DomainResult<Vec<Role>> {
        let wanted: BTreeSet<RoleId> = ids.iter().copied().collect();
        let rows = self
            .roles
            .select(&Specification::all().and(move |row: &RoleRow| wanted.contains(&row.id)))?;
        Ok(rows
            .iter()
            .map(|row| self.map(row))
            .collect::<Result<Vec<_>, _>>()?)
    }
}

/// Translates a role filter into row predicates confined to `institution_id`.
fn specification(filter: &RoleFilter, institution_id: InstitutionId) -> Specification<RoleRow> {
    let statuses = filter.statuses.as_ref().map(|statuses| {
        statuses
            .iter()
            .map(|s| s.as_str().to_string())
            .collect::<BTreeSet<_>>()
    });
    let name = filter.name.as_ref().map(|name| name.to_lowercase());

    Specification::all()
        .and(move |row: &RoleRow| row.institution_id == institution_id)
        .and_if_present(statuses, |row: &RoleRow, statuses| statuses.contains(&row.status))
        .and_if_present(name, |row: &RoleRow, needle: &String| {
            row.name.to_lowercase().contains(needle.as_str())
        })
}

impl ListPort<Role, RoleFilter> for RoleAdapter {
    fn find_all(&self, pageable: &Pageable, filter: &RoleFilter) -> DomainResult<Page<Role, RoleFilter>> {
        let institution_id = required_scope(filter)?;
        let spec = specification(filter, institution_id);
        debug!(%institution_id, predicates = spec.predicate_count(), "selecting roles");
        list_page(&self.roles, spec, pageable, filter, |row| self.map(row))
    }
}

impl ScopedReadPort<Role, RoleId> for RoleAdapter {
    fn find_by_id_and_institution_id(
        &self,
        id: &RoleId,
        institution_id: &InstitutionId,
    ) -> DomainResult<Option<Role>> {
        match self.roles.get(id)? {
            Some(row) if row.institution_id == *institution_id => Ok(Some(self.map(&row)?)),
            _ => Ok(None),
        }
    }
}

impl RoleReadPort for RoleAdapter {
    fn find_all_by_institution_id(&self, institution_id: &InstitutionId) -> DomainResult<Vec<Role>> {
        let institution_id = *institution_id;
        let rows = self
            .roles
            .select(&Specification::all().and(move |row: &RoleRow| row.institution_id == institution_id))?;
        Ok(rows
            .iter()
            .map(|row| self.map(row))
            .collect::<Result<Vec<_>, _>>()?)
    }

    fn exists_by_name_and_institution_id(
        &self,
        name: &str,
        institution_id: &InstitutionId,
    ) -> DomainResult<bool> {
        let institution_id = *institution_id;
        let name = name.to_string();
        let rows = self.roles.select(
            &Specification::all()
                .and(move |row: &RoleRow| row.institution_id == institution_id)
                .and(move |row: &RoleRow| row.name == name),
        )?;
        Ok(!rows.is_empty())
    }
}

impl RoleSavePort for RoleAdapter {
    fn save(&self, role: &Role) -> DomainResult<()> {
        self.roles.upsert(role_to_row(role))?;
        debug!(role_id = %role.id(), status = %role.status(), "role stored");
        Ok(())
    }
}
