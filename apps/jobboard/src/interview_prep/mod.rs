//! Interview preparation: one long backend call, shown with simulated progress.
//!
//! The backend gives no progress signal while the AI workflow runs. The step shown to
//! the user is advanced by a timer and has no relation to what the server is doing;
//! it only stops when the call itself resolves.

pub mod simulator;

use crate::errors::{ClientError, ErrorKind};
use crate::models::InterviewPrepGuide;

pub use simulator::PrepSimulator;

/// Labels cycled through while the guide is generated.
pub const PREP_STEPS: [&str; 6] = [
    "Researching company",
    "Analyzing role level",
    "Mapping interview rounds",
    "Preparing round-by-round guide",
    "Generating common questions",
    "Finalizing your guide",
];

pub const LAST_STEP: usize = PREP_STEPS.len() - 1;

/// In-flight key for the prep request of one application.
pub fn prep_key(application_id: &str) -> String {
    format!("interview-prep:{application_id}")
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrepState {
    Idle,
    Loading { step: usize },
    Ready(Box<InterviewPrepGuide>),
    Failed(PrepFailure),
}

impl PrepState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PrepState::Ready(_) | PrepState::Failed(_))
    }

    pub fn step_label(&self) -> Option<&'static str> {
        match self {
            PrepState::Loading { step } => PREP_STEPS.get(*step).copied(),
            _ => None,
        }
    }
}

/// What the failed view needs: the copy, and whether to offer "Try again".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepFailure {
    pub kind: ErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl From<&ClientError> for PrepFailure {
    fn from(e: &ClientError) -> Self {
        Self {
            kind: e.kind(),
            message: e.user_message(),
            retryable: e.is_retryable(),
        }
    }
}
