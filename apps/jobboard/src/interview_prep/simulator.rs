use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::JobBoardApi;
use crate::config::Config;
use crate::dedup::InFlightRequests;
use crate::errors::ClientError;
use crate::interview_prep::{prep_key, PrepFailure, PrepState, LAST_STEP};
use crate::models::InterviewPrepGuide;

/// `interval_at` panics on a zero period.
const MIN_STEP_INTERVAL: Duration = Duration::from_millis(1);

/// Drives one interview-prep request and publishes `PrepState` while it runs.
///
/// The step timer lives inside `run`'s future: it stops on the first terminal
/// transition, and dropping the future (the user leaving the screen) drops the timer
/// and releases the in-flight key.
pub struct PrepSimulator {
    step_interval: Duration,
    in_flight: InFlightRequests,
    state: watch::Sender<PrepState>,
}

impl PrepSimulator {
    pub fn new(step_interval: Duration, in_flight: InFlightRequests) -> Self {
        let (state, _) = watch::channel(PrepState::Idle);
        Self {
            step_interval: step_interval.max(MIN_STEP_INTERVAL),
            in_flight,
            state,
        }
    }

    pub fn from_config(config: &Config, in_flight: InFlightRequests) -> Self {
        Self::new(config.prep_step_interval, in_flight)
    }

    pub fn subscribe(&self) -> watch::Receiver<PrepState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> PrepState {
        self.state.borrow().clone()
    }

    /// Requests the guide for `application_id`.
    ///
    /// A failure is published as `Failed` and returned; nothing is retried. Calling
    /// `run` again is the retry.
    pub async fn run(
        &self,
        api: &dyn JobBoardApi,
        application_id: &str,
    ) -> Result<InterviewPrepGuide, ClientError> {
        let _ticket = self.in_flight.acquire(prep_key(application_id))?;

        let mut step = 0;
        self.state.send_replace(PrepState::Loading { step });
        info!("Preparing interview guide for application {application_id}");

        let mut ticker = interval_at(Instant::now() + self.step_interval, self.step_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let request = api.interview_prep(application_id);
        tokio::pin!(request);

        let result = loop {
            tokio::select! {
                biased;
                result = &mut request => break result,
                _ = ticker.tick() => {
                    step = (step + 1).min(LAST_STEP);
                    debug!("Interview prep {application_id}: step {step}");
                    self.state.send_replace(PrepState::Loading { step });
                }
            }
        };

        match result {
            Ok(guide) => {
                self.state
                    .send_replace(PrepState::Ready(Box::new(guide.clone())));
                Ok(guide)
            }
            Err(e) => {
                warn!("Interview prep for {application_id} failed: {e}");
                self.state.send_replace(PrepState::Failed(PrepFailure::from(&e)));
                Err(e)
            }
        }
    }
}
