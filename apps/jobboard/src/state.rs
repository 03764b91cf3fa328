use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::Config;
use crate::errors::ClientError;
use crate::interview_prep::PrepSimulator;
use crate::recommendations::RecalculationTrigger;
use crate::store::{Store, Viewer};

/// Everything a command needs: config, the session store and the API client.
///
/// The in-flight registry lives on the client; the flows built here share it.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<Store>,
    pub api: ApiClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ClientError> {
        let store = Arc::new(Store::open(&config.state_path)?);
        let api = ApiClient::new(&config, Arc::clone(&store))?;
        Ok(Self { config, store, api })
    }

    pub fn viewer(&self) -> Viewer {
        self.store.viewer()
    }

    pub fn recalculation(&self) -> RecalculationTrigger {
        RecalculationTrigger::from_config(&self.config)
    }

    pub fn prep_simulator(&self) -> PrepSimulator {
        PrepSimulator::from_config(&self.config, self.api.in_flight().clone())
    }
}
