pub mod config;
pub mod error;
pub mod form;
pub mod state;
