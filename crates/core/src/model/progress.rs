use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::ids::ProblemId;
use crate::model::problem::Problem;

/// Completed/total pair for a topic or for the whole course.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub completed: u32,
    pub total: u32,
}

impl Counts {
    #[must_use]
    pub fn new(completed: u32, total: u32) -> Self {
        Self { completed, total }
    }

    /// Completion percentage, rounded to the nearest integer.
    ///
    /// An empty topic reports 0% rather than dividing by zero.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let ratio = f64::from(self.completed) / f64::from(self.total);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rounded = (ratio * 100.0).round() as u32;
        rounded
    }
}

/// Saved completion state as the server reports it.
///
/// Aptitude endpoints return an explicit per-problem map; DSA endpoints only
/// return how many of the topic's problems are done, which marks the first N
/// rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompletionMap {
    Explicit(HashMap<ProblemId, bool>),
    FirstN(u32),
}

impl CompletionMap {
    #[must_use]
    pub fn is_complete(&self, problem: &Problem) -> bool {
        match self {
            CompletionMap::Explicit(map) => map.get(problem.id()).copied().unwrap_or(false),
            CompletionMap::FirstN(count) => problem.number() <= *count,
        }
    }
}

/// Server view of a topic at load time. Transient; repainted from scratch on
/// every fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicSnapshot {
    pub completion: CompletionMap,
    pub topic: Option<Counts>,
    pub overall: Option<Counts>,
}

/// Authoritative counts carried by a successful update response.
///
/// Every field is optional: the renderer paints whatever the server sent and
/// falls back to local row counts for the rest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProgressDelta {
    pub topic: Option<Counts>,
    pub overall: Option<Counts>,
}

/// One category line in the course-wide summary.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryProgress {
    pub name: String,
    pub percent: f64,
}

/// Course-wide completion percentages, keyed by category name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CourseSummary {
    pub categories: Vec<CategoryProgress>,
}

impl CourseSummary {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
