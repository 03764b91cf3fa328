use serde::Deserialize;
use tracing::info;

use crate::api::{encode_segment, ApiClient};
use crate::errors::ClientError;
use crate::models::Application;

/// The part of an application the apply and check endpoints echo back.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRef {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub interview_prep_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApplyResponse {
    application: ApplicationRef,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApplicationCheck {
    #[serde(default)]
    pub applied: bool,
    #[serde(default)]
    pub application: Option<ApplicationRef>,
}

#[derive(Debug, Deserialize)]
struct MyApplicationsResponse {
    #[serde(default)]
    applications: Vec<Application>,
}

impl ApiClient {
    /// POST /api/applications/apply/:jobId
    ///
    /// Refuses a second apply for the same job while the first is still in flight.
    pub async fn apply(&self, job_id: &str) -> Result<ApplicationRef, ClientError> {
        let _ticket = self.in_flight.acquire(format!("apply:{job_id}"))?;
        let path = format!("/api/applications/apply/{}", encode_segment(job_id));
        let response: ApplyResponse = self.post(&path, &serde_json::json!({})).await?;
        info!("Applied to job {job_id} (application {})", response.application.id);
        Ok(response.application)
    }

    /// GET /api/applications/check/:jobId
    pub async fn check_application(&self, job_id: &str) -> Result<ApplicationCheck, ClientError> {
        self.get(&format!(
            "/api/applications/check/{}",
            encode_segment(job_id)
        ))
        .await
    }

    /// GET /api/applications/my-applications
    pub async fn my_applications(&self) -> Result<Vec<Application>, ClientError> {
        let response: MyApplicationsResponse =
            self.get("/api/applications/my-applications").await?;
        Ok(response.applications)
    }
}
