use serde::{Deserialize, Serialize};

use crate::model::ids::ProblemId;

/// Monotonic tag for one toggle request.
///
/// Each begun toggle gets a fresh sequence number from its board; a server
/// response only applies if the row is still pending under the same number,
/// which makes late responses for superseded requests inert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestSeq(u64);

impl RequestSeq {
    #[must_use]
    pub fn new(seq: u64) -> Self {
        Self(seq)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A single practice problem listed on a topic page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    id: ProblemId,
    number: u32,
    title: String,
}

impl Problem {
    /// Creates a problem with its page identifier and 1-based row number.
    #[must_use]
    pub fn new(id: ProblemId, number: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            number,
            title: title.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &ProblemId {
        &self.id
    }

    /// 1-based position of the problem's row on the page.
    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Per-problem control state.
///
/// `Incomplete --begin--> Pending --confirm--> Complete`, with `Pending`
/// falling back to `Incomplete` on rejection and staying `Complete` on a
/// benign already-completed conflict. `Complete` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlState {
    Incomplete,
    Pending(RequestSeq),
    Complete,
}

impl ControlState {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, ControlState::Pending(_))
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, ControlState::Complete)
    }
}
