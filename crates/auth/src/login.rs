use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use ays_core::{DomainError, DomainResult};

use crate::claims::build_claims;
use crate::port::{PasswordVerifier, Token, TokenIssuer, UserReadPort, UserSavePort};

/// Credentials presented at login.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email_address: String,
    pub password: String,
}

impl core::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email_address", &self.email_address)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Exchanges credentials for a session token.
pub struct UserLoginService<U, S, V, T> {
    users: U,
    save: S,
    verifier: V,
    issuer: T,
}

impl<U, S, V, T> UserLoginService<U, S, V, T>
where
    U: UserReadPort,
    S: UserSavePort,
    V: PasswordVerifier,
    T: TokenIssuer,
{
    pub fn new(users: U, save: S, verifier: V, issuer: T) -> Self {
        Self {
            users,
            save,
            verifier,
            issuer,
        }
    }

    /// Every credential failure reads the same to the caller so that the
    /// response never reveals whether an email address is registered.
    pub fn login(&self, request: &LoginRequest) -> DomainResult<Token> {
        let rejected = || DomainError::unauthenticated("email address or password is not valid");

        let Some(mut user) = self.users.find_by_email_address(&request.email_address)? else {
            warn!("login rejected: unknown email address");
            return Err(rejected());
        };
        if !self.verifier.matches(&request.password, user.password()) {
            warn!(user_id = %user.id(), "login rejected: password mismatch");
            return Err(rejected());
        }
        if !user.is_active() {
            warn!(user_id = %user.id(), status = %user.status(), "login rejected: user not active");
            return Err(DomainError::unauthenticated(format!(
                "user is not active! id:{}",
                user.id()
            )));
        }
        if user.roles().is_empty() {
            warn!(user_id = %user.id(), "login rejected: user has no role");
            return Err(DomainError::unauthenticated(format!(
                "user has no role! id:{}",
                user.id()
            )));
        }

        // Saved only after the token is issued.
        user.record_login(Utc::now());
        let claims = build_claims(&user)?;
        let token = self.issuer.issue(&claims)?;
        self.save.save(&user)?;
        info!(user_id = %user.id(), "user logged in");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Duration;

    use super::*;
    use crate::claims::Claims;
    use crate::user::fixtures::{institution, role_granting, user};
    use crate::user::{Password, User, UserStatus};

    struct FakeUsers(Option<User>);

    impl UserReadPort for FakeUsers {
        fn find_by_email_address(&self, email_address: &str) -> DomainResult<Option<User>> {
            Ok(self
                .0
                .clone()
                .filter(|u| u.email_address() == email_address))
        }
    }

    #[derive(Default)]
    struct FakeSave {
        saved: Mutex<Vec<User>>,
    }

    impl UserSavePort for FakeSave {
        fn save(&self, user: &User) -> DomainResult<()> {
            self.saved.lock().unwrap().push(user.clone());
            Ok(())
        }
    }

    struct PlainVerifier;

    impl PasswordVerifier for PlainVerifier {
        fn matches(&self, raw: &str, password: &Password) -> bool {
            password.hashed_value() == format!("hashed:{raw}")
        }
    }

    #[derive(Default)]
    struct RecordingIssuer {
        issued: AtomicUsize,
        last: Mutex<Option<Claims>>,
        broken: bool,
    }

    impl TokenIssuer for RecordingIssuer {
        fn issue(&self, claims: &Claims) -> DomainResult<Token> {
            if self.broken {
                return Err(DomainError::storage("signer down"));
            }
            self.issued.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(claims.clone());
            Ok(Token {
                access_token: "signed".to_string(),
                access_token_expires_at: Utc::now() + Duration::hours(2),
            })
        }
    }

    type Service = UserLoginService<FakeUsers, FakeSave, PlainVerifier, RecordingIssuer>;

    fn loginable(status: UserStatus, with_role: bool) -> User {
        let institution = institution();
        let roles = if with_role {
            vec![role_granting(institution.id(), &["role:list"])]
        } else {
            vec![]
        };
        let base = user(status);
        User::new(
            base.id(),
            base.profile().clone(),
            status,
            Password::new(base.password().id(), "hashed:secret"),
        )
        .unwrap()
        .with_institution(institution)
        .with_roles(roles)
    }

    fn service(user: Option<User>) -> Service {
        UserLoginService::new(
            FakeUsers(user),
            FakeSave::default(),
            PlainVerifier,
            RecordingIssuer::default(),
        )
    }

    fn request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email_address: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn successful_login_records_attempt_and_issues_token() {
        let service = service(Some(loginable(UserStatus::Active, true)));

        let token = service.login(&request("ayse@example.org", "secret")).unwrap();

        assert_eq!(token.access_token, "signed");
        assert_eq!(service.issuer.issued.load(Ordering::SeqCst), 1);

        let saved = service.save.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        let recorded = saved[0].login_attempt().and_then(|a| a.last_login_at());
        assert!(recorded.is_some());

        let claims = service.issuer.last.lock().unwrap().clone().unwrap();
        assert_eq!(claims.last_login_at(), recorded);
        assert!(claims.permissions().unwrap().contains("role:list"));
    }

    #[test]
    fn unknown_email_and_wrong_password_look_the_same() {
        let service = service(Some(loginable(UserStatus::Active, true)));

        let unknown = service.login(&request("nobody@example.org", "secret")).unwrap_err();
        let mismatch = service.login(&request("ayse@example.org", "wrong")).unwrap_err();

        assert_eq!(unknown, mismatch);
        assert!(matches!(unknown, DomainError::Unauthenticated(_)));
        assert!(service.save.saved.lock().unwrap().is_empty());
        assert_eq!(service.issuer.issued.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn inactive_user_cannot_log_in() {
        for status in [UserStatus::Passive, UserStatus::Deleted, UserStatus::NotVerified] {
            let service = service(Some(loginable(status, true)));
            let result = service.login(&request("ayse@example.org", "secret"));
            assert!(matches!(result, Err(DomainError::Unauthenticated(_))), "{status}");
        }
    }

    #[test]
    fn user_without_roles_cannot_log_in() {
        let service = service(Some(loginable(UserStatus::Active, false)));

        let result = service.login(&request("ayse@example.org", "secret"));

        assert!(matches!(result, Err(DomainError::Unauthenticated(_))));
        assert!(service.save.saved.lock().unwrap().is_empty());
    }

    #[test]
    fn failed_signing_leaves_the_user_unsaved() {
        let mut service = service(Some(loginable(UserStatus::Active, true)));
        service.issuer.broken = true;

        let result = service.login(&request("ayse@example.org", "secret"));

        assert_eq!(result, Err(DomainError::storage("signer down")));
        assert!(service.save.saved.lock().unwrap().is_empty());
    }

    #[test]
    fn user_without_institution_is_not_saved() {
        let base = loginable(UserStatus::Active, true);
        let homeless = User::new(base.id(), base.profile().clone(), UserStatus::Active, base.password().clone())
            .unwrap()
            .with_roles(base.roles().to_vec());
        let service = service(Some(homeless));

        let result = service.login(&request("ayse@example.org", "secret"));

        assert!(matches!(result, Err(DomainError::PreconditionViolation(_))));
        assert!(service.save.saved.lock().unwrap().is_empty());
        assert_eq!(service.issuer.issued.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn request_debug_hides_the_password() {
        let rendered = format!("{:?}", request("ayse@example.org", "secret"));
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("ayse@example.org"));
    }
}
