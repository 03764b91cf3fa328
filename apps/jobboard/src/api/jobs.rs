use serde::{Deserialize, Serialize};

use crate::api::{encode_segment, ApiClient};
use crate::errors::ClientError;
use crate::models::{FitScore, Job, JobPage};

/// Server-side page size of the full job listing.
pub const JOBS_PAGE_SIZE: u32 = 6;

#[derive(Debug, Serialize)]
struct JobListQuery<'a> {
    page: u32,
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JobEnvelope {
    Wrapped { job: Job },
    Bare(Job),
}

/// A recommendation is either a job carrying its own `fitScore`, or a
/// `{ job, fitScore }` pair. Both normalise to a `Job` with `fit_score` set.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecommendationItem {
    Nested {
        job: Job,
        #[serde(default, rename = "fitScore", alias = "score")]
        fit_score: Option<FitScore>,
    },
    Flat(Job),
}

impl From<RecommendationItem> for Job {
    fn from(item: RecommendationItem) -> Self {
        match item {
            RecommendationItem::Nested { mut job, fit_score } => {
                if fit_score.is_some() {
                    job.fit_score = fit_score;
                }
                job
            }
            RecommendationItem::Flat(job) => job,
        }
    }
}

fn recommendation_jobs<'de, D>(deserializer: D) -> Result<Vec<Job>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let items = Option::<Vec<RecommendationItem>>::deserialize(deserializer)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .map(Job::from)
        .collect())
}

/// Response of `GET /api/recommendations`: a possibly partial, cached result set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsResponse {
    #[serde(default, deserialize_with = "recommendation_jobs")]
    pub recommendations: Vec<Job>,
    #[serde(default)]
    pub total_cached: usize,
    #[serde(default)]
    pub total_jobs: usize,
    #[serde(default)]
    pub is_calculating: bool,
}

impl ApiClient {
    /// GET /api/jobs: one page of the full listing, optionally filtered server-side.
    pub async fn list_jobs(&self, page: u32, search: Option<&str>) -> Result<JobPage, ClientError> {
        let query = JobListQuery {
            page: page.max(1),
            limit: JOBS_PAGE_SIZE,
            search: search.map(str::trim).filter(|s| !s.is_empty()),
        };
        self.call(reqwest::Method::GET, "/api/jobs", |r| r.query(&query))
            .await
    }

    /// GET /api/jobs/:id
    pub async fn get_job(&self, job_id: &str) -> Result<Job, ClientError> {
        let envelope: JobEnvelope = self
            .get(&format!("/api/jobs/{}", encode_segment(job_id)))
            .await?;
        Ok(match envelope {
            JobEnvelope::Wrapped { job } | JobEnvelope::Bare(job) => job,
        })
    }

    /// GET /api/jobs/recommended/list: the listing annotated with fit scores.
    pub async fn recommended_jobs(&self, page: u32) -> Result<JobPage, ClientError> {
        let query = JobListQuery {
            page: page.max(1),
            limit: JOBS_PAGE_SIZE,
            search: None,
        };
        self.call(reqwest::Method::GET, "/api/jobs/recommended/list", |r| {
            r.query(&query)
        })
        .await
    }
}
