use thiserror::Error;

use crate::model::{
    ControlState, Counts, Problem, ProblemId, ProgressDelta, RequestSeq, TopicId, TopicSnapshot,
};

/// Why a toggle was refused before any request was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ToggleRefusal {
    #[error("no problem is bound to this control")]
    UnknownProblem,
    #[error("a request for this problem is already in flight")]
    InFlight,
    #[error("problem is already completed")]
    AlreadyComplete,
}

/// Whether a server response was applied to its row or discarded as stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reconciled {
    Applied,
    Stale,
}

/// One bound row: a problem plus the state of its toggle control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProblemRow {
    problem: Problem,
    state: ControlState,
}

impl ProblemRow {
    #[must_use]
    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    #[must_use]
    pub fn state(&self) -> ControlState {
        self.state
    }
}

/// In-memory view-model for one topic page.
///
/// The board is the single source of displayed truth: rows are bound once,
/// repainted from server snapshots, and moved through the per-problem control
/// state machine as toggles begin and resolve. All mutation is synchronous;
/// async callers hold no borrow across an await.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressBoard {
    topic: TopicId,
    rows: Vec<ProblemRow>,
    topic_counts: Option<Counts>,
    overall_counts: Option<Counts>,
    next_seq: u64,
}

impl ProgressBoard {
    #[must_use]
    pub fn new(topic: TopicId) -> Self {
        Self {
            topic,
            rows: Vec::new(),
            topic_counts: None,
            overall_counts: None,
            next_seq: 0,
        }
    }

    #[must_use]
    pub fn topic(&self) -> TopicId {
        self.topic
    }

    /// Bind one control per problem. Idempotent: a problem whose id is
    /// already bound is skipped, so re-running the binder is a no-op.
    pub fn bind_rows<I>(&mut self, problems: I)
    where
        I: IntoIterator<Item = Problem>,
    {
        for problem in problems {
            if self.row(problem.id()).is_some() {
                continue;
            }
            self.rows.push(ProblemRow {
                problem,
                state: ControlState::Incomplete,
            });
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[ProblemRow] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, id: &ProblemId) -> Option<&ProblemRow> {
        self.rows.iter().find(|row| row.problem.id() == id)
    }

    fn row_mut(&mut self, id: &ProblemId) -> Option<&mut ProblemRow> {
        self.rows.iter_mut().find(|row| row.problem.id() == id)
    }

    /// Repaint saved state from the server.
    ///
    /// Rows with an in-flight toggle are left alone; their own response will
    /// reconcile them. Count fields overwrite only when the payload carries
    /// them, so a partial snapshot renders whatever is present.
    pub fn apply_snapshot(&mut self, snapshot: &TopicSnapshot) {
        for row in &mut self.rows {
            if row.state.is_pending() {
                continue;
            }
            row.state = if snapshot.completion.is_complete(&row.problem) {
                ControlState::Complete
            } else {
                ControlState::Incomplete
            };
        }
        if let Some(counts) = snapshot.topic {
            self.topic_counts = Some(counts);
        }
        if let Some(counts) = snapshot.overall {
            self.overall_counts = Some(counts);
        }
    }

    /// Overwrite aggregate counts with server-authoritative values.
    pub fn apply_delta(&mut self, delta: &ProgressDelta) {
        if let Some(counts) = delta.topic {
            self.topic_counts = Some(counts);
        }
        if let Some(counts) = delta.overall {
            self.overall_counts = Some(counts);
        }
    }

    /// Start a toggle: move the row to `Pending` and hand back the sequence
    /// number the eventual response must present.
    ///
    /// # Errors
    ///
    /// Refuses without side effects when the id is unbound, a request for
    /// this problem is already in flight, or the problem is already complete.
    pub fn begin_toggle(&mut self, id: &ProblemId) -> Result<RequestSeq, ToggleRefusal> {
        let index = self
            .rows
            .iter()
            .position(|row| row.problem.id() == id)
            .ok_or(ToggleRefusal::UnknownProblem)?;
        match self.rows[index].state {
            ControlState::Pending(_) => Err(ToggleRefusal::InFlight),
            ControlState::Complete => Err(ToggleRefusal::AlreadyComplete),
            ControlState::Incomplete => {
                self.next_seq += 1;
                let seq = RequestSeq::new(self.next_seq);
                self.rows[index].state = ControlState::Pending(seq);
                Ok(seq)
            }
        }
    }

    /// Server confirmed the toggle: the row becomes `Complete`.
    pub fn confirm(&mut self, id: &ProblemId, seq: RequestSeq) -> Reconciled {
        self.resolve(id, seq, ControlState::Complete)
    }

    /// Server (or transport) rejected the toggle: roll the row back to its
    /// pre-toggle state.
    pub fn reject(&mut self, id: &ProblemId, seq: RequestSeq) -> Reconciled {
        self.resolve(id, seq, ControlState::Incomplete)
    }

    /// Server says the problem was already completed: keep the completed
    /// display, no rollback.
    pub fn keep_complete(&mut self, id: &ProblemId, seq: RequestSeq) -> Reconciled {
        self.resolve(id, seq, ControlState::Complete)
    }

    fn resolve(&mut self, id: &ProblemId, seq: RequestSeq, next: ControlState) -> Reconciled {
        let Some(row) = self.row_mut(id) else {
            return Reconciled::Stale;
        };
        if row.state != ControlState::Pending(seq) {
            return Reconciled::Stale;
        }
        row.state = next;
        Reconciled::Applied
    }

    /// Counts derived from the rows themselves; the fallback when the server
    /// has not reported aggregates.
    #[must_use]
    pub fn local_counts(&self) -> Counts {
        #[allow(clippy::cast_possible_truncation)]
        let completed = self
            .rows
            .iter()
            .filter(|row| row.state.is_complete())
            .count() as u32;
        #[allow(clippy::cast_possible_truncation)]
        let total = self.rows.len() as u32;
        Counts::new(completed, total)
    }

    /// Effective topic counts: server-reported when known, local otherwise.
    #[must_use]
    pub fn counts(&self) -> Counts {
        self.topic_counts.unwrap_or_else(|| self.local_counts())
    }

    #[must_use]
    pub fn overall_counts(&self) -> Option<Counts> {
        self.overall_counts
    }

    #[must_use]
    pub fn percent(&self) -> u32 {
        self.counts().percent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CompletionMap;
    use std::collections::HashMap;

    fn numbered_board(total: u32) -> ProgressBoard {
        let mut board = ProgressBoard::new(TopicId::new(3));
        board.bind_rows((1..=total).map(|n| {
            Problem::new(ProblemId::new(n.to_string()), n, format!("Problem {n}"))
        }));
        board
    }

    fn id(raw: &str) -> ProblemId {
        ProblemId::new(raw)
    }

    #[test]
    fn binder_is_idempotent() {
        let mut board = numbered_board(3);
        board.bind_rows(vec![Problem::new(id("2"), 2, "Problem 2")]);
        assert_eq!(board.rows().len(), 3);
    }

    #[test]
    fn begin_toggle_moves_row_to_pending() {
        let mut board = numbered_board(2);
        let seq = board.begin_toggle(&id("1")).unwrap();
        assert_eq!(board.row(&id("1")).unwrap().state(), ControlState::Pending(seq));
    }

    #[test]
    fn begin_toggle_refuses_unknown_problem() {
        let mut board = numbered_board(2);
        assert_eq!(
            board.begin_toggle(&id("9")),
            Err(ToggleRefusal::UnknownProblem)
        );
    }

    #[test]
    fn begin_toggle_refuses_duplicate_submission() {
        let mut board = numbered_board(2);
        board.begin_toggle(&id("1")).unwrap();
        assert_eq!(board.begin_toggle(&id("1")), Err(ToggleRefusal::InFlight));
    }

    #[test]
    fn completed_rows_are_terminal() {
        let mut board = numbered_board(2);
        let seq = board.begin_toggle(&id("1")).unwrap();
        board.confirm(&id("1"), seq);
        assert_eq!(
            board.begin_toggle(&id("1")),
            Err(ToggleRefusal::AlreadyComplete)
        );
    }

    #[test]
    fn reject_rolls_back_to_pre_toggle_state() {
        let mut board = numbered_board(2);
        let seq = board.begin_toggle(&id("1")).unwrap();
        assert_eq!(board.reject(&id("1"), seq), Reconciled::Applied);
        assert_eq!(board.row(&id("1")).unwrap().state(), ControlState::Incomplete);
    }

    #[test]
    fn stale_sequence_is_discarded() {
        let mut board = numbered_board(2);
        let first = board.begin_toggle(&id("1")).unwrap();
        board.reject(&id("1"), first);

        // The user clicked again before the late response arrived.
        let second = board.begin_toggle(&id("1")).unwrap();
        assert_eq!(board.confirm(&id("1"), first), Reconciled::Stale);
        assert_eq!(
            board.row(&id("1")).unwrap().state(),
            ControlState::Pending(second)
        );

        assert_eq!(board.confirm(&id("1"), second), Reconciled::Applied);
        assert_eq!(board.row(&id("1")).unwrap().state(), ControlState::Complete);
    }

    #[test]
    fn resolving_twice_is_inert() {
        let mut board = numbered_board(2);
        let seq = board.begin_toggle(&id("1")).unwrap();
        assert_eq!(board.confirm(&id("1"), seq), Reconciled::Applied);
        assert_eq!(board.confirm(&id("1"), seq), Reconciled::Stale);
        assert_eq!(board.local_counts(), Counts::new(1, 2));
    }

    #[test]
    fn snapshot_repaints_rows_and_counts() {
        let mut board = numbered_board(4);
        let snapshot = TopicSnapshot {
            completion: CompletionMap::FirstN(2),
            topic: None,
            overall: Some(Counts::new(10, 40)),
        };
        board.apply_snapshot(&snapshot);

        assert!(board.row(&id("1")).unwrap().state().is_complete());
        assert!(board.row(&id("2")).unwrap().state().is_complete());
        assert!(!board.row(&id("3")).unwrap().state().is_complete());
        assert_eq!(board.counts(), Counts::new(2, 4));
        assert_eq!(board.overall_counts(), Some(Counts::new(10, 40)));
    }

    #[test]
    fn snapshot_leaves_pending_rows_alone() {
        let mut board = numbered_board(2);
        let seq = board.begin_toggle(&id("2")).unwrap();

        let mut map = HashMap::new();
        map.insert(id("1"), true);
        board.apply_snapshot(&TopicSnapshot {
            completion: CompletionMap::Explicit(map),
            topic: None,
            overall: None,
        });

        assert_eq!(board.row(&id("2")).unwrap().state(), ControlState::Pending(seq));
    }

    #[test]
    fn server_counts_win_over_local_fallback() {
        let mut board = numbered_board(4);
        assert_eq!(board.counts(), Counts::new(0, 4));

        board.apply_delta(&ProgressDelta {
            topic: Some(Counts::new(5, 20)),
            overall: None,
        });
        assert_eq!(board.counts(), Counts::new(5, 20));
        assert_eq!(board.percent(), 25);
    }

    #[test]
    fn partial_delta_keeps_previous_counts() {
        let mut board = numbered_board(4);
        board.apply_delta(&ProgressDelta {
            topic: Some(Counts::new(1, 4)),
            overall: Some(Counts::new(3, 40)),
        });
        board.apply_delta(&ProgressDelta::default());
        assert_eq!(board.counts(), Counts::new(1, 4));
        assert_eq!(board.overall_counts(), Some(Counts::new(3, 40)));
    }
}
