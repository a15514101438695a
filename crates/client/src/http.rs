use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use prep_core::model::{CourseSummary, Problem, TopicId, TopicSnapshot, Track};

use crate::api::{MarkOutcome, ProgressApi};
use crate::error::ApiError;
use crate::wire::{
    ALREADY_COMPLETED_MESSAGE, AptitudeProgressResponse, CourseProgressResponse,
    StudentProgressResponse, UpdateAptitudeRequest, UpdateAptitudeResponse, UpdateDsaRequest,
    UpdateDsaResponse, course_summary,
};

// Paths are fixed by the server; only the origin is configurable.
const UPDATE_APTITUDE_PATH: &str = "update_aptitude_progress";
const GET_APTITUDE_PATH: &str = "get_aptitude_progress";
const UPDATE_DSA_PATH: &str = "update_progress";
const STUDENT_PROGRESS_PATH: &str = "student_progress";
const COURSE_PROGRESS_PATH: &str = "get_progress";

/// reqwest-backed implementation of [`ProgressApi`].
///
/// One instance serves one track; the aptitude and DSA endpoint families
/// share transport and error mapping but differ in paths and payloads.
#[derive(Clone)]
pub struct HttpProgressApi {
    http: Client,
    base: Url,
    track: Track,
}

impl HttpProgressApi {
    #[must_use]
    pub fn new(http: Client, base: Url, track: Track) -> Self {
        Self { http, base, track }
    }

    #[must_use]
    pub fn track(&self) -> Track {
        self.track
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!("POST {url}");
        let response = self.http.post(url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn get_json<R>(&self, path: &str, query: &[(&str, String)]) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!("GET {url}");
        let response = self.http.get(url).query(query).send().await?;
        Self::decode(response).await
    }

    async fn decode<R>(response: reqwest::Response) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            warn!("progress endpoint answered HTTP {status}");
            return Err(ApiError::HttpStatus(status));
        }
        response
            .json::<R>()
            .await
            .map_err(|err| ApiError::Malformed(err.to_string()))
    }

    fn rejection(message: Option<String>) -> ApiError {
        ApiError::Rejected(message.unwrap_or_else(|| "request was not successful".to_string()))
    }
}

#[async_trait]
impl ProgressApi for HttpProgressApi {
    async fn fetch_topic(&self, topic: TopicId) -> Result<TopicSnapshot, ApiError> {
        match self.track {
            Track::Aptitude => {
                let response: AptitudeProgressResponse =
                    self.get_json(GET_APTITUDE_PATH, &[]).await?;
                if !response.success {
                    return Err(Self::rejection(response.message));
                }
                Ok(response.snapshot())
            }
            Track::Dsa => {
                let query = [("topic_id", topic.to_string())];
                let response: StudentProgressResponse =
                    self.get_json(STUDENT_PROGRESS_PATH, &query).await?;
                if !response.success {
                    return Err(Self::rejection(None));
                }
                Ok(response.snapshot())
            }
        }
    }

    async fn mark_complete(
        &self,
        problem: &Problem,
        topic: TopicId,
        desired: bool,
    ) -> Result<MarkOutcome, ApiError> {
        match self.track {
            Track::Aptitude => {
                let body = UpdateAptitudeRequest {
                    problem_id: problem.id().to_string(),
                    topic_id: topic.value(),
                    status: desired,
                };
                let response: UpdateAptitudeResponse =
                    self.post_json(UPDATE_APTITUDE_PATH, &body).await?;
                if response.success {
                    return Ok(MarkOutcome::Updated(response.delta()));
                }
                if response.message.as_deref() == Some(ALREADY_COMPLETED_MESSAGE) {
                    return Ok(MarkOutcome::AlreadyComplete);
                }
                Err(Self::rejection(response.message))
            }
            Track::Dsa => {
                let body = UpdateDsaRequest {
                    question_id: problem.number(),
                    topic_id: topic.value(),
                };
                let response: UpdateDsaResponse = self.post_json(UPDATE_DSA_PATH, &body).await?;
                if response.success {
                    return Ok(MarkOutcome::Updated(response.delta()));
                }
                if response.message.as_deref() == Some(ALREADY_COMPLETED_MESSAGE) {
                    return Ok(MarkOutcome::AlreadyComplete);
                }
                Err(Self::rejection(response.message))
            }
        }
    }

    async fn fetch_course_summary(&self) -> Result<CourseSummary, ApiError> {
        let response: CourseProgressResponse = self.get_json(COURSE_PROGRESS_PATH, &[]).await?;
        Ok(course_summary(response))
    }
}
