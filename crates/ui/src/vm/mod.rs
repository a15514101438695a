mod summary_vm;
mod topic_vm;

pub use summary_vm::{CategoryBarVm, map_category_bars};
pub use topic_vm::{NoticeVm, ProblemRowVm, ProgressVm, map_notices, map_problem_rows, map_progress};
