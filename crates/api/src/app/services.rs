//! Service wiring: every domain service bound to the in-memory adapters.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use ays_assignment::AssignmentReadService;
use ays_auth::{
    PasswordVerifier, RoleCreateService, RoleReadService, RoleUpdateService, TokenIssuer,
    UserLoginService,
};
use ays_infra::AppConfig;
use ays_infra::memory::{
    AssignmentAdapter, InMemoryDatabase, InstitutionAdapter, PermissionAdapter, RoleAdapter,
    UserAdapter,
};
use ays_institution::InstitutionService;

pub type RoleReads = RoleReadService<RoleAdapter>;
pub type RoleCreates = RoleCreateService<RoleAdapter, RoleAdapter, PermissionAdapter>;
pub type RoleUpdates = RoleUpdateService<RoleAdapter, RoleAdapter>;
pub type Logins =
    UserLoginService<UserAdapter, UserAdapter, Arc<dyn PasswordVerifier>, Arc<dyn TokenIssuer>>;
pub type Assignments = AssignmentReadService<AssignmentAdapter>;
pub type Institutions = InstitutionService<InstitutionAdapter>;

pub struct AppServices {
    pub config: AppConfig,
    pub db: InMemoryDatabase,
    pub role_reads: RoleReads,
    pub role_creates: RoleCreates,
    pub role_updates: RoleUpdates,
    pub logins: Logins,
    pub assignments: Assignments,
    pub institutions: Institutions,
}

impl AppServices {
    /// Password hashing and token signing are not done here; callers plug
    /// their own `verifier` and `issuer` in.
    pub fn in_memory(
        config: AppConfig,
        db: InMemoryDatabase,
        verifier: Arc<dyn PasswordVerifier>,
        issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            role_reads: RoleReadService::new(db.role_adapter()),
            role_creates: RoleCreateService::new(
                db.role_adapter(),
                db.role_adapter(),
                db.permission_adapter(),
            ),
            role_updates: RoleUpdateService::new(db.role_adapter(), db.role_adapter()),
            logins: UserLoginService::new(db.user_adapter(), db.user_adapter(), verifier, issuer),
            assignments: AssignmentReadService::new(db.assignment_adapter()),
            institutions: InstitutionService::new(db.institution_adapter()),
            config,
            db,
        }
    }
}

/// Loads the configuration for `env`, initialises logging and wires the
/// services.
pub fn bootstrap(
    env: &str,
    db: InMemoryDatabase,
    verifier: Arc<dyn PasswordVerifier>,
    issuer: Arc<dyn TokenIssuer>,
) -> anyhow::Result<Arc<AppServices>> {
    let config = AppConfig::load(env)
        .with_context(|| format!("failed to load configuration for environment '{env}'"))?;
    ays_observability::init(&config.logging);

    info!(
        env,
        default_page_size = config.paging.default_page_size,
        max_page_size = config.paging.max_page_size,
        "services wired"
    );
    Ok(Arc::new(AppServices::in_memory(config, db, verifier, issuer)))
}

#[cfg(test)]
mod tests {
    use ays_auth::{Claims, Password, Token};
    use ays_core::{DomainError, DomainResult};

    use super::*;

    struct RejectingVerifier;

    impl PasswordVerifier for RejectingVerifier {
        fn matches(&self, _raw: &str, _password: &Password) -> bool {
            false
        }
    }

    struct UnusedIssuer;

    impl TokenIssuer for UnusedIssuer {
        fn issue(&self, _claims: &Claims) -> DomainResult<Token> {
            Err(DomainError::storage("no signer configured"))
        }
    }

    #[test]
    fn bootstrap_without_config_files_uses_defaults() {
        let services = bootstrap(
            "no-such-environment",
            InMemoryDatabase::new(),
            Arc::new(RejectingVerifier),
            Arc::new(UnusedIssuer),
        )
        .unwrap();

        assert_eq!(services.config.paging.default_page_size, 10);
        assert_eq!(services.config.paging.max_page_size, 100);
        assert!(services.institutions.summaries().unwrap().is_empty());
    }

    #[test]
    fn bootstrap_can_run_twice() {
        for _ in 0..2 {
            assert!(
                bootstrap(
                    "no-such-environment",
                    InMemoryDatabase::new(),
                    Arc::new(RejectingVerifier),
                    Arc::new(UnusedIssuer),
                )
                .is_ok()
            );
        }
    }
}
