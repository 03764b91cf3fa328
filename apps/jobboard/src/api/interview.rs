use reqwest::Method;
use tracing::info;

use crate::api::{encode_segment, ApiClient};
use crate::errors::ClientError;
use crate::models::interview::InterviewPrepEnvelope;
use crate::models::InterviewPrepGuide;

/// Application id from an `interviewPrepUrl` such as `/interview-prep/665f1c`.
///
/// Accepts a bare id too, so the CLI can take either.
pub fn application_id_from_prep_url(url_or_id: &str) -> Option<&str> {
    let trimmed = url_or_id.trim();
    let without_query = trimmed.split(['?', '#']).next().unwrap_or(trimmed);
    without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
}

impl ApiClient {
    /// GET /api/interview/prepare/:applicationId
    ///
    /// The backend runs the whole AI workflow inside this one request, so it gets the
    /// long interview-prep timeout instead of the client default.
    pub(crate) async fn fetch_interview_prep(
        &self,
        application_id: &str,
    ) -> Result<InterviewPrepGuide, ClientError> {
        let path = format!("/api/interview/prepare/{}", encode_segment(application_id));
        let timeout = self.interview_prep_timeout;
        let envelope: InterviewPrepEnvelope = self
            .call(Method::GET, &path, |r| r.timeout(timeout))
            .await?;
        let guide = envelope.into_guide();
        info!(
            "Interview prep for application {application_id}: {} rounds, {} questions",
            guide
                .interview_rounds
                .as_ref()
                .map(|r| r.rounds.len())
                .unwrap_or(0),
            guide.common_questions.len()
        );
        Ok(guide)
    }
}
