use serde::{Deserialize, Serialize};
use serde_json::Value;

/// AI-generated interview preparation guide for one application.
///
/// Keys come straight from the AI workflow (snake_case); camelCase aliases cover the
/// backend re-serialising them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterviewPrepGuide {
    #[serde(default, alias = "companyInfo")]
    pub company_info: Option<String>,
    /// "Fresher", "SDE-1", "SDE-2", "Senior"
    #[serde(default, alias = "roleLevel")]
    pub role_level: Option<String>,
    #[serde(default, alias = "interviewLinks")]
    pub interview_links: Vec<InterviewLink>,
    #[serde(default, alias = "interviewRounds")]
    pub interview_rounds: Option<InterviewRounds>,
    #[serde(default, alias = "dsaPrep")]
    pub dsa_prep: Option<Value>,
    #[serde(default, alias = "systemDesignPrep")]
    pub system_design_prep: Option<Value>,
    #[serde(default, alias = "behavioralPrep")]
    pub behavioral_prep: Option<Value>,
    #[serde(default, alias = "commonQuestions")]
    pub common_questions: Vec<CommonQuestion>,
    #[serde(default, alias = "questionsToAsk", alias = "prepared_answers", alias = "preparedAnswers")]
    pub questions_to_ask: Vec<QuestionToAsk>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewLink {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterviewRounds {
    #[serde(default, alias = "totalRounds")]
    pub total_rounds: u32,
    #[serde(default, alias = "typicalDuration")]
    pub typical_duration: Option<String>,
    #[serde(default)]
    pub rounds: Vec<InterviewRound>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewRound {
    #[serde(alias = "roundNumber")]
    pub round_number: u32,
    pub name: String,
    #[serde(default, rename = "type")]
    pub round_type: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default, alias = "whatToExpect")]
    pub what_to_expect: Option<String>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default, alias = "passRate")]
    pub pass_rate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonQuestion {
    pub question: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, alias = "howToAnswer")]
    pub how_to_answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionToAsk {
    pub question: String,
    #[serde(default, alias = "whyAsk")]
    pub why_ask: Option<String>,
}

/// Response envelope of `GET /api/interview/prepare/:applicationId`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum InterviewPrepEnvelope {
    Wrapped {
        #[serde(alias = "interviewPrep", alias = "guide", alias = "data")]
        prep: InterviewPrepGuide,
    },
    Bare(InterviewPrepGuide),
}

impl InterviewPrepEnvelope {
    pub(crate) fn into_guide(self) -> InterviewPrepGuide {
        match self {
            InterviewPrepEnvelope::Wrapped { prep } | InterviewPrepEnvelope::Bare(prep) => prep,
        }
    }
}
