pub mod application_status;
pub mod user_role;

pub use application_status::ApplicationStatus;
pub use user_role::UserRole;
