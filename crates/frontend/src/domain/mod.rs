pub mod approvals;
pub mod batches;
pub mod catchment;
pub mod crops;
pub mod dashboard;
pub mod registration;
