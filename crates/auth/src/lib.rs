//! `ays-auth`: RBAC model, session claims and the role/login services.
//!
//! This crate is intentionally decoupled from HTTP and storage: storage,
//! password hashing and token signing are reached through the traits in
//! [`port`].

pub mod authorize;
pub mod claims;
pub mod login;
pub mod permissions;
pub mod port;
pub mod principal;
pub mod role_service;
pub mod roles;
pub mod user;

pub use authorize::authorize;
pub use claims::{Claims, TokenClaim, build_claims};
pub use login::{LoginRequest, UserLoginService};
pub use permissions::{Permission, names as permission_names};
pub use port::{
    PasswordVerifier, PermissionReadPort, RoleReadPort, RoleSavePort, Token, TokenIssuer,
    UserReadPort, UserSavePort,
};
pub use principal::Identity;
pub use role_service::{RoleCreateService, RoleReadService, RoleUpdateService};
pub use roles::{CreateRole, Role, RoleFilter, RoleStatus};
pub use user::{LoginAttempt, Password, User, UserProfile, UserStatus};
