use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use prep_core::model::{
    CompletionMap, Counts, CourseSummary, Problem, ProblemId, ProgressDelta, TopicId,
    TopicSnapshot,
};

use crate::error::ApiError;

/// Result of a state-changing mark request that reached the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    /// The server recorded the change and reported whatever counts it has.
    Updated(ProgressDelta),
    /// Benign conflict: the problem was already completed. Not an error.
    AlreadyComplete,
}

/// Contract for the progress endpoints.
#[async_trait]
pub trait ProgressApi: Send + Sync {
    /// Fetch the saved completion state for a topic.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures, non-2xx statuses,
    /// `success: false` replies, or undecodable bodies.
    async fn fetch_topic(&self, topic: TopicId) -> Result<TopicSnapshot, ApiError>;

    /// Ask the server to record the desired completion state for a problem.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` as for `fetch_topic`; an already-completed reply is
    /// `Ok(MarkOutcome::AlreadyComplete)`, not an error.
    async fn mark_complete(
        &self,
        problem: &Problem,
        topic: TopicId,
        desired: bool,
    ) -> Result<MarkOutcome, ApiError>;

    /// Fetch the course-wide category percentages.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport or decoding failures.
    async fn fetch_course_summary(&self) -> Result<CourseSummary, ApiError>;
}

/// Simple in-memory progress server for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryProgressApi {
    state: Arc<Mutex<InMemoryState>>,
}

#[derive(Default)]
struct InMemoryState {
    completed: HashSet<(TopicId, ProblemId)>,
    topic_totals: HashMap<TopicId, u32>,
    overall_total: Option<u32>,
    summary: CourseSummary,
    fail_marks: bool,
    fail_fetches: bool,
}

impl InMemoryProgressApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_topic_total(self, topic: TopicId, total: u32) -> Self {
        self.lock().topic_totals.insert(topic, total);
        self
    }

    #[must_use]
    pub fn with_overall_total(self, total: u32) -> Self {
        self.lock().overall_total = Some(total);
        self
    }

    pub fn seed_completed(&self, topic: TopicId, id: ProblemId) {
        self.lock().completed.insert((topic, id));
    }

    pub fn set_summary(&self, summary: CourseSummary) {
        self.lock().summary = summary;
    }

    /// Make subsequent mark requests fail with an HTTP 500.
    pub fn fail_marks(&self, fail: bool) {
        self.lock().fail_marks = fail;
    }

    /// Make subsequent fetches fail with an HTTP 500.
    pub fn fail_fetches(&self, fail: bool) {
        self.lock().fail_fetches = fail;
    }

    #[must_use]
    pub fn completed_count(&self, topic: TopicId) -> u32 {
        let state = self.lock();
        #[allow(clippy::cast_possible_truncation)]
        let count = state
            .completed
            .iter()
            .filter(|(t, _)| *t == topic)
            .count() as u32;
        count
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, InMemoryState> {
        self.state.lock().expect("in-memory progress state poisoned")
    }

    fn counts_for(state: &InMemoryState, topic: TopicId) -> Option<Counts> {
        let total = *state.topic_totals.get(&topic)?;
        #[allow(clippy::cast_possible_truncation)]
        let completed = state
            .completed
            .iter()
            .filter(|(t, _)| *t == topic)
            .count() as u32;
        Some(Counts::new(completed, total))
    }

    fn overall_counts(state: &InMemoryState) -> Option<Counts> {
        let total = state.overall_total?;
        #[allow(clippy::cast_possible_truncation)]
        let completed = state.completed.len() as u32;
        Some(Counts::new(completed, total))
    }
}

#[async_trait]
impl ProgressApi for InMemoryProgressApi {
    async fn fetch_topic(&self, topic: TopicId) -> Result<TopicSnapshot, ApiError> {
        let state = self.lock();
        if state.fail_fetches {
            return Err(ApiError::HttpStatus(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
        let completion = state
            .completed
            .iter()
            .filter(|(t, _)| *t == topic)
            .map(|(_, id)| (id.clone(), true))
            .collect();
        Ok(TopicSnapshot {
            completion: CompletionMap::Explicit(completion),
            topic: Self::counts_for(&state, topic),
            overall: Self::overall_counts(&state),
        })
    }

    async fn mark_complete(
        &self,
        problem: &Problem,
        topic: TopicId,
        _desired: bool,
    ) -> Result<MarkOutcome, ApiError> {
        let mut state = self.lock();
        if state.fail_marks {
            return Err(ApiError::HttpStatus(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
        if !state.completed.insert((topic, problem.id().clone())) {
            return Ok(MarkOutcome::AlreadyComplete);
        }
        Ok(MarkOutcome::Updated(ProgressDelta {
            topic: Self::counts_for(&state, topic),
            overall: Self::overall_counts(&state),
        }))
    }

    async fn fetch_course_summary(&self) -> Result<CourseSummary, ApiError> {
        let state = self.lock();
        if state.fail_fetches {
            return Err(ApiError::HttpStatus(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
        Ok(state.summary.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prep_core::model::ProblemId;

    fn problem(raw: &str, number: u32) -> Problem {
        Problem::new(ProblemId::new(raw), number, format!("Problem {raw}"))
    }

    #[tokio::test]
    async fn marking_twice_is_a_benign_conflict() {
        let api = InMemoryProgressApi::new().with_topic_total(TopicId::new(11), 20);
        let target = problem("q12", 12);

        let first = api
            .mark_complete(&target, TopicId::new(11), true)
            .await
            .unwrap();
        assert!(matches!(first, MarkOutcome::Updated(_)));

        let second = api
            .mark_complete(&target, TopicId::new(11), true)
            .await
            .unwrap();
        assert_eq!(second, MarkOutcome::AlreadyComplete);
        assert_eq!(api.completed_count(TopicId::new(11)), 1);
    }

    #[tokio::test]
    async fn fetch_reports_seeded_completion() {
        let api = InMemoryProgressApi::new().with_topic_total(TopicId::new(11), 20);
        api.seed_completed(TopicId::new(11), ProblemId::new("q3"));

        let snapshot = api.fetch_topic(TopicId::new(11)).await.unwrap();
        assert_eq!(snapshot.topic, Some(Counts::new(1, 20)));
        assert!(snapshot.completion.is_complete(&problem("q3", 3)));
        assert!(!snapshot.completion.is_complete(&problem("q4", 4)));
    }
}
