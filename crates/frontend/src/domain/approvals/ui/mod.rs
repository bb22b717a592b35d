pub mod documents;
pub mod list;
