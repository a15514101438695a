use chrono::{DateTime, Duration, Utc};

/// How long a transient notice stays visible before auto-dismissal.
pub const DISMISS_AFTER_MS: i64 = 3_000;

/// Visual flavor of a notice. `Info` covers benign conflicts such as
/// "already completed"; it must never render in the error style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// A transient on-screen message tied to one toggle or load attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    kind: NoticeKind,
    message: String,
    posted_at: DateTime<Utc>,
}

impl Notice {
    #[must_use]
    pub fn new(kind: NoticeKind, message: impl Into<String>, posted_at: DateTime<Utc>) -> Self {
        Self {
            kind,
            message: message.into(),
            posted_at,
        }
    }

    #[must_use]
    pub fn kind(&self) -> NoticeKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn posted_at(&self) -> DateTime<Utc> {
        self.posted_at
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.posted_at + Duration::milliseconds(DISMISS_AFTER_MS)
    }
}

/// Holds the currently visible notices and drops them as they expire.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoticeCenter {
    notices: Vec<Notice>,
}

impl NoticeCenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    #[must_use]
    pub fn visible(&self) -> &[Notice] {
        &self.notices
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Drop every notice whose dismissal deadline has passed.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        self.notices.retain(|notice| notice.expires_at() > now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn notices_expire_after_the_fixed_delay() {
        let posted = fixed_now();
        let mut center = NoticeCenter::new();
        center.push(Notice::new(NoticeKind::Success, "Progress updated successfully!", posted));

        center.prune(posted + Duration::milliseconds(DISMISS_AFTER_MS - 1));
        assert_eq!(center.visible().len(), 1);

        center.prune(posted + Duration::milliseconds(DISMISS_AFTER_MS));
        assert!(center.is_empty());
    }

    #[test]
    fn prune_keeps_younger_notices() {
        let posted = fixed_now();
        let mut center = NoticeCenter::new();
        center.push(Notice::new(NoticeKind::Error, "Failed to load progress", posted));
        center.push(Notice::new(
            NoticeKind::Info,
            "You've already completed this question!",
            posted + Duration::milliseconds(2_000),
        ));

        center.prune(posted + Duration::milliseconds(3_500));
        assert_eq!(center.visible().len(), 1);
        assert_eq!(center.visible()[0].kind(), NoticeKind::Info);
    }
}
