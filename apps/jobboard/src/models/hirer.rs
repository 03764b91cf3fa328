use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::application::ApplicationStatus;
use crate::models::fit_score::FitScore;
use crate::models::job::Job;

/// A job owned by the logged-in hirer, with its applicant count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HirerJob {
    #[serde(flatten)]
    pub job: Job,
    #[serde(default, alias = "applicationsCount", alias = "applicationCount")]
    pub applicant_count: u32,
}

/// One applicant for a hirer's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(alias = "_id", alias = "applicationId")]
    pub application_id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub fit_score: Option<FitScore>,
    #[serde(alias = "createdAt")]
    pub applied_at: DateTime<Utc>,
    #[serde(default)]
    pub resume_id: Option<String>,
}

/// Score block with the rest of the analyzer payload kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoredAnalysis {
    #[serde(default)]
    pub score: f64,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    #[serde(default, alias = "ats_analysis", alias = "ats")]
    pub ats_analysis: Option<ScoredAnalysis>,
    #[serde(default, alias = "project_analysis", alias = "projects")]
    pub project_analysis: Option<ScoredAnalysis>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HiringDecision {
    #[serde(rename = "Strong Accept")]
    StrongAccept,
    #[serde(rename = "Accept")]
    Accept,
    #[serde(rename = "Reject")]
    Reject,
    // Unknown labels from the model land here.
    #[default]
    #[serde(rename = "Consider", other)]
    Consider,
}

impl HiringDecision {
    pub fn label(&self) -> &'static str {
        match self {
            HiringDecision::StrongAccept => "Strong Accept",
            HiringDecision::Accept => "Accept",
            HiringDecision::Reject => "Reject",
            HiringDecision::Consider => "Consider",
        }
    }
}

/// AI hiring recommendation for one application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiRecommendation {
    #[serde(default)]
    pub recommendation: HiringDecision,
    #[serde(default, alias = "confidence_score")]
    pub confidence_score: f64,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default, alias = "key_factors")]
    pub key_factors: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
    #[serde(default)]
    pub suggestion: String,
}
