mod state;
mod view;

pub use state::ApprovalsState;
pub use view::AdminApprovals;
