use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::fit_score::FitScore;
use crate::models::job::Job;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Applied,
    Shortlisted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// The job an application points at: populated by some endpoints, a bare id in others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobRef {
    Embedded(Box<Job>),
    Id(String),
}

impl JobRef {
    pub fn id(&self) -> &str {
        match self {
            JobRef::Embedded(job) => &job.id,
            JobRef::Id(id) => id,
        }
    }

    pub fn job(&self) -> Option<&Job> {
        match self {
            JobRef::Embedded(job) => Some(job),
            JobRef::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "jobId")]
    pub job: JobRef,
    #[serde(default, alias = "applicantId", alias = "user", deserialize_with = "reference_id")]
    pub applicant: Option<String>,
    pub status: ApplicationStatus,
    #[serde(alias = "createdAt")]
    pub applied_at: DateTime<Utc>,
    #[serde(default)]
    pub fit_score: Option<FitScore>,
    #[serde(default)]
    pub interview_prep_url: Option<String>,
}

impl Application {
    pub fn job_title(&self) -> &str {
        self.job.job().map(|j| j.title.as_str()).unwrap_or("")
    }

    pub fn company(&self) -> &str {
        self.job.job().map(|j| j.company.as_str()).unwrap_or("")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Reference {
    Id(String),
    Object {
        #[serde(alias = "_id")]
        id: String,
    },
}

/// Accepts either a bare id or a populated document and keeps only the id.
pub(crate) fn reference_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Reference>::deserialize(deserializer)?.map(|r| match r {
        Reference::Id(id) | Reference::Object { id } => id,
    }))
}
