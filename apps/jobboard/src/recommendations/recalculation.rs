use std::time::Duration;

use tracing::{info, warn};

use crate::api::JobBoardApi;
use crate::config::Config;
use crate::dedup::InFlightRequests;
use crate::errors::ClientError;
use crate::recommendations::fetcher::{fetch_recommendations, RecommendationSet};

/// In-flight key shared by every recalculation trigger.
pub const RECALCULATE_KEY: &str = "recalculate-scores";

#[derive(Debug, Clone, PartialEq)]
pub enum RecalcOutcome {
    /// The rescoring was queued and recommendations were re-read once after the wait.
    /// `is_calculating` may still be true; that is not an error.
    Refreshed(RecommendationSet),
    /// Another trigger is already running. Nothing was sent.
    AlreadyRunning,
}

/// Fire-and-refetch after a resume upload.
///
/// The backend rescores in the background and gives no completion signal, so the
/// trigger waits a fixed delay and reads the cache once. It does not poll.
#[derive(Debug, Clone)]
pub struct RecalculationTrigger {
    delay: Duration,
}

impl RecalculationTrigger {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.recalc_refetch_delay)
    }

    pub async fn trigger(
        &self,
        api: &dyn JobBoardApi,
        in_flight: &InFlightRequests,
    ) -> Result<RecalcOutcome, ClientError> {
        let Some(_ticket) = in_flight.try_acquire(RECALCULATE_KEY) else {
            info!("Recalculation already running; ignoring trigger");
            return Ok(RecalcOutcome::AlreadyRunning);
        };

        let response = api.recalculate_scores().await?;
        if !response.success {
            warn!("Backend did not confirm the recalculation; refetching anyway");
        }
        info!(
            "Recalculation queued; refetching recommendations in {:?}",
            self.delay
        );

        tokio::time::sleep(self.delay).await;

        Ok(RecalcOutcome::Refreshed(fetch_recommendations(api).await))
    }
}
