//! HTTP implementation of the records API
//!
//! Speaks the REST contract of the records backend: every success body is an
//! `{ data, code, message }` envelope and failures may carry a `detail`.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::DashboardConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::traits::RecordsApi;
use shared::{
    ApiEnvelope, ErrorBody, Exam, ExamId, ExamUpdatePayload, ListEnvelope, NewExam, NewStudent,
    Student, StudentId, StudentPatch,
};

/// Records API client over HTTP
#[derive(Clone)]
pub struct HttpRecordsApi {
    base_url: Url,
    client: Client,
}

impl HttpRecordsApi {
    /// Create a client from configuration
    pub fn new(config: &DashboardConfig) -> DashboardResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| DashboardError::Config {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            base_url: config.api_base_url.clone(),
            client,
        })
    }

    /// Append `segments` to the base path, each percent-encoded as one
    /// segment.
    fn endpoint(&self, segments: &[&str]) -> DashboardResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DashboardError::Config {
                message: format!("Base URL '{}' cannot carry a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn student_endpoint(&self, id: &StudentId) -> DashboardResult<Url> {
        self.endpoint(&["students", id.as_str()])
    }

    fn exam_endpoint(&self, id: &str) -> DashboardResult<Url> {
        self.endpoint(&["exams", id])
    }

    /// Turn a non-2xx response into an `Api` error, keeping a string detail.
    async fn check_status(response: Response) -> DashboardResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail_message());

        debug!(status = status.as_u16(), detail = ?detail, "records API returned an error status");
        Err(DashboardError::Api {
            status: status.as_u16(),
            detail,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> DashboardResult<T> {
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| DashboardError::Decode {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl RecordsApi for HttpRecordsApi {
    async fn list_students(&self) -> DashboardResult<Vec<Student>> {
        let url = self.endpoint(&["students"])?;
        debug!(%url, "GET students");
        let response = Self::check_status(self.client.get(url).send().await?).await?;
        let envelope: ListEnvelope<Student> = Self::decode(response).await?;
        Ok(envelope.data)
    }

    async fn create_student(&self, student: &NewStudent) -> DashboardResult<Student> {
        let url = self.endpoint(&["students"])?;
        debug!(%url, "POST student");
        let response = Self::check_status(self.client.post(url).json(student).send().await?).await?;
        let envelope: ApiEnvelope<Student> = Self::decode(response).await?;
        Ok(envelope.data)
    }

    async fn update_student(&self, id: &StudentId, patch: &StudentPatch) -> DashboardResult<()> {
        let url = self.student_endpoint(id)?;
        debug!(%url, "PUT student");
        Self::check_status(self.client.put(url).json(patch).send().await?).await?;
        Ok(())
    }

    async fn delete_student(&self, id: &StudentId) -> DashboardResult<()> {
        let url = self.student_endpoint(id)?;
        debug!(%url, "DELETE student");
        Self::check_status(self.client.delete(url).send().await?).await?;
        Ok(())
    }

    async fn list_exams(&self, student_id: &StudentId) -> DashboardResult<Vec<Exam>> {
        let url = self.exam_endpoint(student_id.as_str())?;
        debug!(%url, "GET exams");
        let response = Self::check_status(self.client.get(url).send().await?).await?;
        let envelope: ListEnvelope<Exam> = Self::decode(response).await?;
        Ok(envelope.data)
    }

    async fn create_exam(&self, exam: &NewExam) -> DashboardResult<Exam> {
        let url = self.endpoint(&["exams"])?;
        debug!(%url, "POST exam");
        let response = Self::check_status(self.client.post(url).json(exam).send().await?).await?;
        let envelope: ApiEnvelope<Exam> = Self::decode(response).await?;
        Ok(envelope.data)
    }

    async fn update_exam(&self, id: &ExamId, payload: &ExamUpdatePayload) -> DashboardResult<()> {
        let url = self.exam_endpoint(id.as_str())?;
        debug!(%url, "PUT exam");
        Self::check_status(self.client.put(url).json(payload).send().await?).await?;
        Ok(())
    }

    async fn delete_exam(&self, id: &ExamId) -> DashboardResult<()> {
        let url = self.exam_endpoint(id.as_str())?;
        debug!(%url, "DELETE exam");
        Self::check_status(self.client.delete(url).send().await?).await?;
        Ok(())
    }
}
