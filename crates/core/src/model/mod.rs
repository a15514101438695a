mod ids;
mod problem;
mod progress;
mod track;

pub use ids::{ParseIdError, ProblemId, TopicId};
pub use problem::{ControlState, Problem, RequestSeq};
pub use progress::{
    CategoryProgress, CompletionMap, Counts, CourseSummary, ProgressDelta, TopicSnapshot,
};
pub use track::{ParseTrackError, Track};
