use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Deserialize;
use tracing::info;

use crate::api::ApiClient;
use crate::errors::ClientError;

const RESUME_FIELD: &str = "resume";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecalculateResponse {
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Deserialize)]
struct UploadedResume {
    #[serde(alias = "_id")]
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    #[serde(default)]
    resume_id: Option<String>,
    #[serde(default)]
    resume: Option<UploadedResume>,
}

impl UploadResponse {
    fn into_resume_id(self) -> Option<String> {
        self.resume_id
            .or(self.resume.map(|r| r.id))
            .filter(|id| !id.is_empty())
    }
}

fn content_type_for(path: &Path) -> Result<&'static str, ClientError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => Ok("application/pdf"),
        "doc" => Ok("application/msword"),
        "docx" => Ok("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "txt" => Ok("text/plain"),
        _ => Err(ClientError::Validation(format!(
            "Unsupported resume format '{}'. Use PDF, DOC, DOCX or TXT.",
            path.display()
        ))),
    }
}

impl ApiClient {
    /// POST /api/resume/upload: multipart field `resume`.
    ///
    /// Records the returned resume reference on the stored user so the fit-score
    /// views unlock without another `/auth/me` round trip.
    pub async fn upload_resume(&self, path: &Path) -> Result<String, ClientError> {
        let content_type = content_type_for(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("resume")
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        if bytes.is_empty() {
            return Err(ClientError::Validation(format!(
                "{} is empty",
                path.display()
            )));
        }

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(content_type)?;
        let form = Form::new().part(RESUME_FIELD, part);

        let response: UploadResponse = self
            .call(Method::POST, "/api/resume/upload", |r| r.multipart(form))
            .await?;
        let resume_id = response.into_resume_id().ok_or_else(|| ClientError::Api {
            status: 200,
            code: None,
            message: "upload response carried no resume id".to_string(),
        })?;

        info!("Uploaded resume {} as {resume_id}", path.display());
        self.store.set_resume_id(resume_id.clone())?;
        Ok(resume_id)
    }
}
