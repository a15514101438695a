use prep_core::board::ProgressBoard;
use prep_core::model::ControlState;
use prep_core::notice::{NoticeCenter, NoticeKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProblemRowVm {
    pub id: String,
    pub number: u32,
    pub title: String,
    pub button_label: &'static str,
    pub button_class: &'static str,
    pub disabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressVm {
    pub completed: u32,
    pub total: u32,
    pub percent: u32,
    pub overall_label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoticeVm {
    pub message: String,
    pub class: &'static str,
}

#[must_use]
pub fn map_problem_rows(board: &ProgressBoard) -> Vec<ProblemRowVm> {
    board
        .rows()
        .iter()
        .map(|row| {
            let (button_label, button_class, disabled) = match row.state() {
                ControlState::Incomplete => ("Mark Complete", "btn btn-primary status-btn", false),
                ControlState::Pending(_) => {
                    ("Saving...", "btn btn-primary status-btn is-pending", true)
                }
                ControlState::Complete => ("Completed", "btn btn-success status-btn", true),
            };
            ProblemRowVm {
                id: row.problem().id().to_string(),
                number: row.problem().number(),
                title: row.problem().title().to_string(),
                button_label,
                button_class,
                disabled,
            }
        })
        .collect()
}

#[must_use]
pub fn map_progress(board: &ProgressBoard) -> ProgressVm {
    let counts = board.counts();
    let overall_label = board.overall_counts().map(|overall| {
        format!(
            "Overall progress: {}/{} questions completed",
            overall.completed, overall.total
        )
    });
    ProgressVm {
        completed: counts.completed,
        total: counts.total,
        percent: counts.percent(),
        overall_label,
    }
}

#[must_use]
pub fn map_notices(center: &NoticeCenter) -> Vec<NoticeVm> {
    center
        .visible()
        .iter()
        .map(|notice| {
            let class = match notice.kind() {
                NoticeKind::Info => "notice notice-info",
                NoticeKind::Success => "notice notice-success",
                NoticeKind::Error => "notice notice-error",
            };
            NoticeVm {
                message: notice.message().to_string(),
                class,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use prep_core::model::{Counts, Problem, ProblemId, ProgressDelta, TopicId};
    use prep_core::notice::Notice;
    use prep_core::time::fixed_now;

    fn board() -> ProgressBoard {
        let mut board = ProgressBoard::new(TopicId::new(11));
        board.bind_rows(
            (1..=3).map(|n| {
                Problem::new(ProblemId::new(format!("q{n}")), n, format!("Problem q{n}"))
            }),
        );
        board
    }

    #[test]
    fn incomplete_row_renders_a_live_control() {
        let rows = map_problem_rows(&board());
        assert_eq!(rows[0].button_label, "Mark Complete");
        assert!(!rows[0].disabled);
    }

    #[test]
    fn pending_row_disables_its_control() {
        let mut board = board();
        board.begin_toggle(&ProblemId::new("q2")).unwrap();
        let rows = map_problem_rows(&board);
        assert_eq!(rows[1].button_label, "Saving...");
        assert!(rows[1].disabled);
    }

    #[test]
    fn completed_row_renders_terminal_control() {
        let mut board = board();
        let seq = board.begin_toggle(&ProblemId::new("q1")).unwrap();
        board.confirm(&ProblemId::new("q1"), seq);
        let rows = map_problem_rows(&board);
        assert_eq!(rows[0].button_label, "Completed");
        assert_eq!(rows[0].button_class, "btn btn-success status-btn");
        assert!(rows[0].disabled);
    }

    #[test]
    fn progress_prefers_server_counts_and_reports_percent() {
        let mut board = board();
        board.apply_delta(&ProgressDelta {
            topic: Some(Counts::new(5, 20)),
            overall: Some(Counts::new(12, 80)),
        });
        let progress = map_progress(&board);
        assert_eq!(progress.completed, 5);
        assert_eq!(progress.total, 20);
        assert_eq!(progress.percent, 25);
        assert_eq!(
            progress.overall_label.as_deref(),
            Some("Overall progress: 12/80 questions completed")
        );
    }

    #[test]
    fn progress_falls_back_to_row_counts() {
        let progress = map_progress(&board());
        assert_eq!(progress.completed, 0);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.percent, 0);
        assert_eq!(progress.overall_label, None);
    }

    #[test]
    fn notices_map_kind_to_style() {
        let mut center = NoticeCenter::new();
        center.push(Notice::new(NoticeKind::Info, "noted", fixed_now()));
        center.push(Notice::new(NoticeKind::Error, "broke", fixed_now()));
        let notices = map_notices(&center);
        assert_eq!(notices[0].class, "notice notice-info");
        assert_eq!(notices[1].class, "notice notice-error");
    }
}
