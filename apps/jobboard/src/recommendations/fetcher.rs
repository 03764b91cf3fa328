use tracing::{debug, warn};

use crate::api::JobBoardApi;
use crate::models::Job;
use crate::recommendations::reconciler::reconcile;

/// A reconciled, possibly partial, view of the user's recommendations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationSet {
    pub jobs: Vec<Job>,
    /// How many jobs already have a cached score.
    pub cached_count: usize,
    pub total_count: usize,
    pub is_calculating: bool,
}

impl RecommendationSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Reads the cached recommendations. Any failure yields an empty set: the
/// dashboard renders "no recommendations" rather than an error.
pub async fn fetch_recommendations(api: &dyn JobBoardApi) -> RecommendationSet {
    match api.recommendations().await {
        Ok(response) => {
            debug!(
                "Fetched {} recommendations ({}/{} cached, calculating: {})",
                response.recommendations.len(),
                response.total_cached,
                response.total_jobs,
                response.is_calculating
            );
            RecommendationSet {
                jobs: reconcile(response.recommendations),
                cached_count: response.total_cached,
                total_count: response.total_jobs,
                is_calculating: response.is_calculating,
            }
        }
        Err(e) => {
            warn!("Failed to fetch recommendations: {e}");
            RecommendationSet::empty()
        }
    }
}
