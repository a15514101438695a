//! Request/response shapes for the progress endpoints.
//!
//! Field names match the server contract exactly. Optional response fields
//! default to `None` so a partial payload decodes instead of failing the
//! whole render.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use prep_core::model::{
    CategoryProgress, CompletionMap, Counts, CourseSummary, ProblemId, ProgressDelta,
    TopicSnapshot,
};

/// Message the update endpoint returns when the problem was already done.
pub const ALREADY_COMPLETED_MESSAGE: &str = "Question already completed!";

/// Completed/total pair as it appears inside aptitude payloads.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WireCounts {
    pub completed: u32,
    pub total: u32,
}

impl From<WireCounts> for Counts {
    fn from(value: WireCounts) -> Self {
        Counts::new(value.completed, value.total)
    }
}

// ─── Aptitude family ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UpdateAptitudeRequest {
    pub problem_id: String,
    pub topic_id: u32,
    pub status: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAptitudeResponse {
    pub success: bool,
    #[serde(default)]
    pub completed_count: Option<u32>,
    #[serde(default)]
    pub total_questions: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

impl UpdateAptitudeResponse {
    /// Counts the server chose to report; missing fields stay unreported.
    #[must_use]
    pub fn delta(&self) -> ProgressDelta {
        let topic = match (self.completed_count, self.total_questions) {
            (Some(completed), Some(total)) => Some(Counts::new(completed, total)),
            _ => None,
        };
        ProgressDelta {
            topic,
            overall: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AptitudeProgressResponse {
    pub success: bool,
    #[serde(default)]
    pub progress: HashMap<String, bool>,
    #[serde(default)]
    pub overall_progress: Option<WireCounts>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AptitudeProgressResponse {
    #[must_use]
    pub fn snapshot(self) -> TopicSnapshot {
        let completion = self
            .progress
            .into_iter()
            .map(|(id, done)| (ProblemId::new(id), done))
            .collect();
        TopicSnapshot {
            completion: CompletionMap::Explicit(completion),
            topic: None,
            overall: self.overall_progress.map(Counts::from),
        }
    }
}

// ─── DSA family ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UpdateDsaRequest {
    pub question_id: u32,
    pub topic_id: u32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDsaResponse {
    pub success: bool,
    #[serde(default)]
    pub topic_progress: Option<u32>,
    #[serde(default)]
    pub total_topic_questions: Option<u32>,
    #[serde(default)]
    pub dsa_progress: Option<u32>,
    #[serde(default)]
    pub total_dsa_questions: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

impl UpdateDsaResponse {
    #[must_use]
    pub fn delta(&self) -> ProgressDelta {
        let topic = match (self.topic_progress, self.total_topic_questions) {
            (Some(completed), Some(total)) => Some(Counts::new(completed, total)),
            _ => None,
        };
        let overall = match (self.dsa_progress, self.total_dsa_questions) {
            (Some(completed), Some(total)) => Some(Counts::new(completed, total)),
            _ => None,
        };
        ProgressDelta { topic, overall }
    }
}

#[derive(Debug, Deserialize)]
pub struct StudentProgressResponse {
    pub success: bool,
    #[serde(default)]
    pub completed_questions: u32,
    #[serde(default)]
    pub dsa_completed: Option<u32>,
    #[serde(default)]
    pub dsa_total: Option<u32>,
}

impl StudentProgressResponse {
    /// The DSA endpoint reports a prefix count, not per-problem state.
    #[must_use]
    pub fn snapshot(self) -> TopicSnapshot {
        let overall = match (self.dsa_completed, self.dsa_total) {
            (Some(completed), Some(total)) => Some(Counts::new(completed, total)),
            _ => None,
        };
        TopicSnapshot {
            completion: CompletionMap::FirstN(self.completed_questions),
            topic: None,
            overall,
        }
    }
}

// ─── Course summary ────────────────────────────────────────────────────────────

/// `GET /get_progress` returns a bare category-name → percentage object.
pub type CourseProgressResponse = BTreeMap<String, f64>;

#[must_use]
pub fn course_summary(response: CourseProgressResponse) -> CourseSummary {
    let categories = response
        .into_iter()
        .map(|(name, percent)| CategoryProgress { name, percent })
        .collect();
    CourseSummary { categories }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aptitude_update_request_serializes_contract_fields() {
        let body = UpdateAptitudeRequest {
            problem_id: "q12".to_string(),
            topic_id: 11,
            status: true,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"problem_id": "q12", "topic_id": 11, "status": true})
        );
    }

    #[test]
    fn aptitude_update_response_carries_topic_counts() {
        let response: UpdateAptitudeResponse = serde_json::from_str(
            r#"{"success": true, "completed_count": 5, "total_questions": 20}"#,
        )
        .unwrap();
        assert!(response.success);
        assert_eq!(response.delta().topic, Some(Counts::new(5, 20)));
        assert_eq!(response.delta().overall, None);
    }

    #[test]
    fn aptitude_update_response_tolerates_missing_counts() {
        let response: UpdateAptitudeResponse =
            serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert_eq!(response.delta(), ProgressDelta::default());
    }

    #[test]
    fn aptitude_progress_maps_ids_and_overall() {
        let response: AptitudeProgressResponse = serde_json::from_str(
            r#"{
                "success": true,
                "progress": {"q1": true, "q2": false},
                "overall_progress": {"completed": 7, "total": 40}
            }"#,
        )
        .unwrap();
        let snapshot = response.snapshot();
        assert_eq!(snapshot.overall, Some(Counts::new(7, 40)));
        match snapshot.completion {
            CompletionMap::Explicit(map) => {
                assert_eq!(map.get(&ProblemId::new("q1")), Some(&true));
                assert_eq!(map.get(&ProblemId::new("q2")), Some(&false));
            }
            CompletionMap::FirstN(_) => panic!("aptitude progress should be explicit"),
        }
    }

    #[test]
    fn dsa_update_response_carries_both_count_pairs() {
        let response: UpdateDsaResponse = serde_json::from_str(
            r#"{
                "success": true,
                "topic_progress": 3,
                "total_topic_questions": 10,
                "dsa_progress": 12,
                "total_dsa_questions": 80
            }"#,
        )
        .unwrap();
        let delta = response.delta();
        assert_eq!(delta.topic, Some(Counts::new(3, 10)));
        assert_eq!(delta.overall, Some(Counts::new(12, 80)));
    }

    #[test]
    fn dsa_update_response_bare_success_decodes() {
        let response: UpdateDsaResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert_eq!(response.delta(), ProgressDelta::default());
    }

    #[test]
    fn student_progress_reports_prefix_completion() {
        let response: StudentProgressResponse = serde_json::from_str(
            r#"{"success": true, "completed_questions": 4, "dsa_completed": 9, "dsa_total": 80}"#,
        )
        .unwrap();
        let snapshot = response.snapshot();
        assert_eq!(snapshot.completion, CompletionMap::FirstN(4));
        assert_eq!(snapshot.overall, Some(Counts::new(9, 80)));
    }

    #[test]
    fn course_progress_is_sorted_by_category() {
        let response: CourseProgressResponse =
            serde_json::from_str(r#"{"DSA": 15.0, "Aptitude": 42.5}"#).unwrap();
        let summary = course_summary(response);
        let names: Vec<&str> = summary
            .categories
            .iter()
            .map(|category| category.name.as_str())
            .collect();
        assert_eq!(names, vec!["Aptitude", "DSA"]);
        assert!((summary.categories[1].percent - 15.0).abs() < f64::EPSILON);
    }
}
