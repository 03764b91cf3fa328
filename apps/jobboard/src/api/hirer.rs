use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::api::{encode_segment, ApiClient};
use crate::errors::ClientError;
use crate::models::{AiRecommendation, ApplicationStatus, Candidate, HirerJob, ResumeAnalysis};

#[derive(Debug, Deserialize)]
struct HirerJobsResponse {
    #[serde(default)]
    jobs: Vec<HirerJob>,
}

#[derive(Debug, Deserialize)]
struct CandidatesResponse {
    #[serde(default, alias = "applications")]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnalysisEnvelope {
    Wrapped {
        #[serde(alias = "data")]
        analysis: ResumeAnalysis,
    },
    Bare(ResumeAnalysis),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecommendationEnvelope {
    Wrapped {
        #[serde(alias = "aiRecommendation", alias = "data")]
        recommendation: AiRecommendation,
    },
    Bare(AiRecommendation),
}

impl ApiClient {
    /// GET /api/hirer/my-jobs
    pub async fn hirer_jobs(&self) -> Result<Vec<HirerJob>, ClientError> {
        let response: HirerJobsResponse = self.get("/api/hirer/my-jobs").await?;
        Ok(response.jobs)
    }

    /// GET /api/hirer/job/:id/candidates
    pub async fn job_candidates(&self, job_id: &str) -> Result<Vec<Candidate>, ClientError> {
        let response: CandidatesResponse = self
            .get(&format!("/api/hirer/job/{}/candidates", encode_segment(job_id)))
            .await?;
        Ok(response.candidates)
    }

    /// POST /api/hirer/analyze-resume/:applicationId
    pub async fn analyze_resume(&self, application_id: &str) -> Result<ResumeAnalysis, ClientError> {
        let path = format!("/api/hirer/analyze-resume/{}", encode_segment(application_id));
        let envelope: AnalysisEnvelope = self.post(&path, &json!({})).await?;
        Ok(match envelope {
            AnalysisEnvelope::Wrapped { analysis } | AnalysisEnvelope::Bare(analysis) => analysis,
        })
    }

    /// POST /api/hirer/ai-recommendation/:applicationId
    pub async fn ai_recommendation(
        &self,
        application_id: &str,
    ) -> Result<AiRecommendation, ClientError> {
        let path = format!(
            "/api/hirer/ai-recommendation/{}",
            encode_segment(application_id)
        );
        let envelope: RecommendationEnvelope = self.post(&path, &json!({})).await?;
        Ok(match envelope {
            RecommendationEnvelope::Wrapped { recommendation }
            | RecommendationEnvelope::Bare(recommendation) => recommendation,
        })
    }

    /// PATCH /api/hirer/application/:applicationId/status
    pub async fn set_application_status(
        &self,
        application_id: &str,
        status: ApplicationStatus,
    ) -> Result<(), ClientError> {
        let path = format!(
            "/api/hirer/application/{}/status",
            encode_segment(application_id)
        );
        let _: serde_json::Value = self
            .patch(&path, &json!({ "status": status.as_str() }))
            .await?;
        info!("Application {application_id} marked {}", status.as_str());
        Ok(())
    }
}
