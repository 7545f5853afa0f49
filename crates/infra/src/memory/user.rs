use std::sync::Arc;

use tracing::debug;

use ays_auth::{User, UserReadPort, UserSavePort};
use ays_core::{DomainResult, Specification};
use ays_institution::InstitutionReadPort;

use super::institution::InstitutionAdapter;
use super::mapper::{user_from_row, user_to_row};
use super::role::RoleAdapter;
use super::rows::UserRow;
use super::store::{InMemoryTable, RowStore};

/// Users with their roles and institution resolved on read.
#[derive(Debug, Clone)]
pub struct UserAdapter {
    users: Arc<InMemoryTable<UserRow>>,
    roles: RoleAdapter,
    institutions: InstitutionAdapter,
}

impl UserAdapter {
    pub fn new(
        users: Arc<InMemoryTable<UserRow>>,
        roles: RoleAdapter,
        institutions: InstitutionAdapter,
    ) -> Self {
        Self {
            users,
            roles,
            institutions,
        }
    }

    fn resolve(&self, row: &UserRow) -> DomainResult<User> {
        let roles = self.roles.find_all_by_ids(&row.role_ids)?;
        let institution = match &row.institution_id {
            Some(id) => self.institutions.find_by_id(id)?,
            None => None,
        };
        Ok(user_from_row(row, roles, institution)?)
    }
}

impl UserReadPort for UserAdapter {
    fn find_by_email_address(&self, email_address: &str) -> DomainResult<Option<User>> {
        let wanted = email_address.trim().to_lowercase();
        let rows = self.users.select(
            &Specification::all()
                .and(move |row: &UserRow| row.email_address.to_lowercase() == wanted),
        )?;
        rows.first().map(|row| self.resolve(row)).transpose()
    }
}

impl UserSavePort for UserAdapter {
    fn save(&self, user: &User) -> DomainResult<()> {
        self.users.upsert(user_to_row(user))?;
        debug!(user_id = %user.id(), "user stored");
        Ok(())
    }
}
