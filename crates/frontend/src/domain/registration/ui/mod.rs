mod availability;
mod form;
mod success;

pub use availability::AvailabilityCheck;
pub use form::{provide_registration_drafts, RegistrationPage};
