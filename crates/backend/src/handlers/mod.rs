pub mod admin;
pub mod batches;
pub mod catchment;
pub mod crops;
pub mod demographics;
pub mod registration;
