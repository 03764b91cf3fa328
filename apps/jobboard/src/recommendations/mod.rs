//! Score materialization: fetch the cached recommendations, order them, and
//! trigger a server-side rescoring after a resume upload.
//!
//! # Architecture
//! - `fetcher` reads `GET /api/recommendations` and never fails; a failed read is an
//!   empty set, logged.
//! - `reconciler` is the pure, stable ordering step.
//! - `recalculation` is the upload follow-up: POST, fixed wait, one refetch.
//!
//! Fit scores are computed asynchronously by the backend, so any set may be partial.
//! `RecommendationSet::is_calculating` carries that through to the views.

pub mod fetcher;
pub mod reconciler;
pub mod recalculation;

pub use fetcher::{fetch_recommendations, RecommendationSet};
pub use reconciler::reconcile;
pub use recalculation::{RecalcOutcome, RecalculationTrigger, RECALCULATE_KEY};
