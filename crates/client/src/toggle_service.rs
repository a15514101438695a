use log::warn;
use std::sync::Arc;

use prep_core::board::{ProgressBoard, Reconciled, ToggleRefusal};
use prep_core::model::{Problem, ProblemId, RequestSeq, TopicId};
use prep_core::notice::{Notice, NoticeKind};
use prep_core::time::Clock;

use crate::api::{MarkOutcome, ProgressApi};
use crate::error::ApiError;

const UPDATED_TEXT: &str = "Progress updated successfully!";
const ALREADY_DONE_TEXT: &str = "You've already completed this question!";
const SAVE_FAILED_TEXT: &str = "Failed to save progress. Please try again.";

//
// ─── TOGGLE OUTCOME ────────────────────────────────────────────────────────────
//

/// What one toggle attempt amounted to, after all reconciliation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Server confirmed; the row is complete and counts are authoritative.
    Confirmed,
    /// Benign conflict; the row stays complete, nothing was double-counted.
    AlreadyComplete,
    /// Transport or application failure; the row rolled back.
    Failed,
    /// Refused before any request was made.
    Refused(ToggleRefusal),
    /// A newer request superseded this one; the response was discarded.
    Stale,
}

/// A settled toggle: its outcome plus the notice to flash, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToggleReport {
    pub outcome: ToggleOutcome,
    pub notice: Option<Notice>,
}

/// Outcome of the synchronous, optimistic phase of a toggle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToggleStart {
    /// The row is pending; the caller must `submit` and then `resolve`.
    InFlight { seq: RequestSeq, problem: Problem },
    /// Settled without touching the network (guards refused it).
    Settled(ToggleReport),
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Drives the optimistic toggle protocol between a board and the server.
///
/// The flow is split into a synchronous `begin` (optimistic paint + guards),
/// an async `submit` that borrows no board state, and a synchronous
/// `resolve` that reconciles the response. UI code runs the three around its
/// own signal writes; tests and headless callers use `toggle`.
#[derive(Clone)]
pub struct ToggleService {
    api: Arc<dyn ProgressApi>,
    clock: Clock,
}

impl ToggleService {
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

    /// Optimistically start a toggle for the given problem.
    ///
    /// Guards run first: an unknown id, an in-flight request for the same
    /// problem, or an already-completed row settles the attempt immediately
    /// without a network call.
    pub fn begin(&self, board: &mut ProgressBoard, id: &ProblemId) -> ToggleStart {
        match board.begin_toggle(id) {
            Ok(seq) => {
                let problem = board
                    .row(id)
                    .map(|row| row.problem().clone())
                    .expect("row exists after begin_toggle succeeded");
                ToggleStart::InFlight { seq, problem }
            }
            Err(refusal) => {
                let notice = match refusal {
                    ToggleRefusal::AlreadyComplete => Some(Notice::new(
                        NoticeKind::Info,
                        ALREADY_DONE_TEXT,
                        self.clock.now(),
                    )),
                    ToggleRefusal::InFlight => None,
                    ToggleRefusal::UnknownProblem => {
                        warn!("toggle requested for unbound problem {id}");
                        None
                    }
                };
                ToggleStart::Settled(ToggleReport {
                    outcome: ToggleOutcome::Refused(refusal),
                    notice,
                })
            }
        }
    }

    /// Send the state change to the server.
    ///
    /// # Errors
    ///
    /// Propagates `ApiError` untouched; `resolve` turns it into a rollback.
    pub async fn submit(
        &self,
        problem: &Problem,
        topic: TopicId,
    ) -> Result<MarkOutcome, ApiError> {
        self.api.mark_complete(problem, topic, true).await
    }

    /// Reconcile the server's answer with the board and produce the notice.
    ///
    /// A stale sequence number means a newer request took over the row; the
    /// late response is dropped with no UI change and no notice.
    pub fn resolve(
        &self,
        board: &mut ProgressBoard,
        id: &ProblemId,
        seq: RequestSeq,
        result: Result<MarkOutcome, ApiError>,
    ) -> ToggleReport {
        let now = self.clock.now();
        match result {
            Ok(MarkOutcome::Updated(delta)) => {
                if board.confirm(id, seq) == Reconciled::Stale {
                    return Self::stale();
                }
                board.apply_delta(&delta);
                ToggleReport {
                    outcome: ToggleOutcome::Confirmed,
                    notice: Some(Notice::new(NoticeKind::Success, UPDATED_TEXT, now)),
                }
            }
            Ok(MarkOutcome::AlreadyComplete) => {
                if board.keep_complete(id, seq) == Reconciled::Stale {
                    return Self::stale();
                }
                ToggleReport {
                    outcome: ToggleOutcome::AlreadyComplete,
                    notice: Some(Notice::new(NoticeKind::Info, ALREADY_DONE_TEXT, now)),
                }
            }
            Err(err) => {
                warn!("progress update for {id} failed: {err}");
                if board.reject(id, seq) == Reconciled::Stale {
                    return Self::stale();
                }
                ToggleReport {
                    outcome: ToggleOutcome::Failed,
                    notice: Some(Notice::new(NoticeKind::Error, SAVE_FAILED_TEXT, now)),
                }
            }
        }
    }

    /// Run a full toggle in one call. Used by tests and headless callers;
    /// the UI drives `begin`/`submit`/`resolve` itself.
    pub async fn toggle(&self, board: &mut ProgressBoard, id: &ProblemId) -> ToggleReport {
        match self.begin(board, id) {
            ToggleStart::Settled(report) => report,
            ToggleStart::InFlight { seq, problem } => {
                let result = self.submit(&problem, board.topic()).await;
                self.resolve(board, id, seq, result)
            }
        }
    }

    fn stale() -> ToggleReport {
        ToggleReport {
            outcome: ToggleOutcome::Stale,
            notice: None,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
