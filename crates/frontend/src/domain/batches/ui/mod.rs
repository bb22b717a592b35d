mod list;
mod traceability;

pub use list::BatchList;
pub use traceability::TraceabilityPage;
