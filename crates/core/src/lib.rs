#![forbid(unsafe_code)]

pub mod board;
pub mod model;
pub mod notice;
pub mod time;

pub use board::{ProblemRow, ProgressBoard, Reconciled, ToggleRefusal};
pub use model::{
    CompletionMap, ControlState, Counts, CourseSummary, Problem, ProblemId, ProgressDelta,
    RequestSeq, TopicId, TopicSnapshot, Track,
};
pub use notice::{Notice, NoticeCenter, NoticeKind};
pub use time::Clock;
