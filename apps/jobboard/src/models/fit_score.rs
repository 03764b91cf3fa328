//! Fit scores as the backend and AI service emit them.
//!
//! The same field arrives either as a bare percentage (`"fitScore": 72`) or as the
//! structured object produced by batch scoring. Both decode into `FitScore` once, here,
//! so nothing downstream has to probe the payload shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Recommendation tier attached to a structured fit score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchTier {
    #[serde(rename = "Highly recommended", alias = "Highly Recommended")]
    HighlyRecommended,
    #[serde(rename = "Recommended")]
    Recommended,
    #[serde(rename = "Consider")]
    Consider,
    #[serde(rename = "Not recommended", alias = "Not Recommended")]
    NotRecommended,
    #[serde(other)]
    Unknown,
}

impl MatchTier {
    /// Tier for a percentage when the server did not label one: 80+ / 65+ / 50+ / below.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            MatchTier::HighlyRecommended
        } else if score >= 65.0 {
            MatchTier::Recommended
        } else if score >= 50.0 {
            MatchTier::Consider
        } else {
            MatchTier::NotRecommended
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchTier::HighlyRecommended => "Highly recommended",
            MatchTier::Recommended => "Recommended",
            MatchTier::Consider => "Consider",
            MatchTier::NotRecommended => "Not recommended",
            MatchTier::Unknown => "Unrated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitScoreDetail {
    #[serde(rename = "fitScore", alias = "overall", alias = "score")]
    pub overall: f64,
    /// category name → percentage (skillsMatch, experienceMatch, ...)
    #[serde(default)]
    pub breakdown: BTreeMap<String, f64>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
    #[serde(default)]
    pub recommendation: Option<MatchTier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FitScore {
    Percentage(f64),
    Detailed(FitScoreDetail),
}

impl FitScore {
    /// Overall percentage regardless of payload shape.
    pub fn overall(&self) -> f64 {
        match self {
            FitScore::Percentage(p) => *p,
            FitScore::Detailed(d) => d.overall,
        }
    }

    pub fn tier(&self) -> MatchTier {
        match self {
            FitScore::Detailed(FitScoreDetail {
                recommendation: Some(tier),
                ..
            }) if *tier != MatchTier::Unknown => *tier,
            _ => MatchTier::from_score(self.overall()),
        }
    }

    pub fn detail(&self) -> Option<&FitScoreDetail> {
        match self {
            FitScore::Detailed(d) => Some(d),
            FitScore::Percentage(_) => None,
        }
    }
}

/// Sort key for a possibly-missing score: absent and non-finite values count as 0.
pub fn effective_score(score: Option<&FitScore>) -> f64 {
    score
        .map(FitScore::overall)
        .filter(|s| s.is_finite())
        .unwrap_or(0.0)
}
