pub mod api_error;
pub mod pagination;
pub mod selector;
pub mod sentinel;
pub mod submission;
