mod state;
mod summary;
mod topic;

pub use state::{ViewError, ViewState, view_state_from_resource};
pub use summary::SummaryView;
pub use topic::TopicView;
