pub mod assignments;
pub mod auth;
pub mod institutions;
pub mod roles;

pub use assignments::AssignmentController;
pub use auth::AuthController;
pub use institutions::InstitutionController;
pub use roles::RoleController;
