use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_API_URL: &str = "http://localhost:8080";
const STATE_FILE_NAME: &str = "state.json";

/// Client configuration loaded from environment variables (and `.env` if present).
/// Every value has a default, so a bare `jobboard` invocation talks to a local backend.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout: Duration,
    /// Interview prep is a single long-running request; it gets its own ceiling.
    pub interview_prep_timeout: Duration,
    /// Fixed wait between firing a recalculation and re-fetching recommendations.
    pub recalc_refetch_delay: Duration,
    /// How often the simulated interview-prep progress advances one step.
    pub prep_step_interval: Duration,
    pub state_path: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let state_path = match std::env::var("JOBBOARD_STATE_PATH") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_state_path(),
        };

        Ok(Config {
            api_base_url: std::env::var("JOBBOARD_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            request_timeout: Duration::from_secs(parse_env("JOBBOARD_REQUEST_TIMEOUT_SECS", 30)?),
            interview_prep_timeout: Duration::from_secs(parse_env(
                "JOBBOARD_INTERVIEW_PREP_TIMEOUT_SECS",
                300,
            )?),
            recalc_refetch_delay: Duration::from_millis(parse_env("JOBBOARD_RECALC_DELAY_MS", 3000)?),
            prep_step_interval: Duration::from_millis(parse_positive_env(
                "JOBBOARD_PREP_STEP_INTERVAL_MS",
                4000,
            )?),
            state_path,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn parse_env(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn parse_positive_env(key: &str, default: u64) -> Result<u64> {
    let value = parse_env(key, default)?;
    if value == 0 {
        anyhow::bail!("{key} must be greater than zero");
    }
    Ok(value)
}

/// `<platform data dir>/jobboard/state.json`, or `./state.json` when no home directory exists.
fn default_state_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "jobboard")
        .map(|dirs| dirs.data_dir().join(STATE_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(STATE_FILE_NAME))
}

#[cfg(test)]
impl Config {
    /// Test configuration pointing at a stub backend, with short timers.
    pub fn for_tests(api_base_url: &str, state_path: PathBuf) -> Self {
        Config {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(5),
            interview_prep_timeout: Duration::from_secs(5),
            recalc_refetch_delay: Duration::from_millis(50),
            prep_step_interval: Duration::from_millis(50),
            state_path,
            rust_log: "debug".to_string(),
        }
    }
}
