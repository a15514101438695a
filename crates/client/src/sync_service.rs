use std::sync::Arc;

use log::warn;

use prep_core::board::ProgressBoard;
use prep_core::model::CourseSummary;
use prep_core::notice::{Notice, NoticeKind};
use prep_core::time::Clock;

use crate::api::ProgressApi;
use crate::error::ApiError;

const LOAD_FAILED_TEXT: &str = "Failed to load progress";

/// Fetches saved progress at page load and the course-wide summary.
#[derive(Clone)]
pub struct SyncService {
    api: Arc<dyn ProgressApi>,
    clock: Clock,
}

impl SyncService {
    #[must_use]
    pub fn new(api: Arc<dyn ProgressApi>) -> Self {
        Self {
            api,
            clock: Clock::system(),
        }
    }

    /// Override the clock (usually for deterministic testing).
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Fetch the saved state for the board's topic and repaint it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the fetch fails; the board is left untouched
    /// so the page keeps rendering its current state.
    pub async fn refresh(&self, board: &mut ProgressBoard) -> Result<(), ApiError> {
        let snapshot = self.api.fetch_topic(board.topic()).await.map_err(|err| {
            warn!("loading saved progress failed: {err}");
            err
        })?;
        board.apply_snapshot(&snapshot);
        Ok(())
    }

    /// Fetch the category percentages for the course summary view.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport or decoding failures.
    pub async fn course_summary(&self) -> Result<CourseSummary, ApiError> {
        self.api.fetch_course_summary().await
    }

    /// Notice shown when an initial load fails.
    #[must_use]
    pub fn load_failure_notice(&self) -> Notice {
        Notice::new(NoticeKind::Error, LOAD_FAILED_TEXT, self.clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryProgressApi;
    use prep_core::model::{Counts, Problem, ProblemId, TopicId};
    use prep_core::time::fixed_clock;

    fn board_of(total: u32) -> ProgressBoard {
        let mut board = ProgressBoard::new(TopicId::new(2));
        board.bind_rows((1..=total).map(|n| {
            Problem::new(ProblemId::new(n.to_string()), n, format!("Problem {n}"))
        }));
        board
    }

    #[tokio::test]
    async fn refresh_paints_saved_state() {
        let api = InMemoryProgressApi::new().with_topic_total(TopicId::new(2), 8);
        api.seed_completed(TopicId::new(2), ProblemId::new("1"));
        api.seed_completed(TopicId::new(2), ProblemId::new("2"));
        let service = SyncService::new(Arc::new(api)).with_clock(fixed_clock());

        let mut board = board_of(8);
        service.refresh(&mut board).await.unwrap();

        assert!(board.row(&ProblemId::new("1")).unwrap().state().is_complete());
        assert!(!board.row(&ProblemId::new("3")).unwrap().state().is_complete());
        assert_eq!(board.counts(), Counts::new(2, 8));
    }

    #[tokio::test]
    async fn refresh_failure_leaves_board_untouched() {
        let api = InMemoryProgressApi::new().with_topic_total(TopicId::new(2), 8);
        api.fail_fetches(true);
        let service = SyncService::new(Arc::new(api)).with_clock(fixed_clock());

        let mut board = board_of(8);
        let err = service.refresh(&mut board).await.unwrap_err();
        assert!(matches!(err, ApiError::HttpStatus(_)));
        assert_eq!(board.counts(), Counts::new(0, 8));

        let notice = service.load_failure_notice();
        assert_eq!(notice.kind(), NoticeKind::Error);
        assert_eq!(notice.message(), "Failed to load progress");
    }
}
