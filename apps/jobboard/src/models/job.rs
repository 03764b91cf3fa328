use serde::{Deserialize, Deserializer, Serialize};

use crate::models::fit_score::FitScore;

/// A job listing as served by the backend. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "display_text")]
    pub salary: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "display_text")]
    pub experience: String,
    #[serde(default, alias = "type")]
    pub job_type: String,
    #[serde(default, alias = "mode")]
    pub work_mode: String,
    #[serde(default)]
    pub description: String,
    /// `None` means "not yet computed", not zero.
    #[serde(default)]
    pub fit_score: Option<FitScore>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pages: u32,
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

/// One page of the job listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPage {
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Salary and experience are sent either as display strings or as
/// `{ "display": "...", ...raw numbers }`. Only the display string is kept.
#[derive(Deserialize)]
#[serde(untagged)]
enum DisplayField {
    Text(String),
    Number(f64),
    Object { display: Option<String> },
}

fn display_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let field = Option::<DisplayField>::deserialize(deserializer)?;
    Ok(match field {
        Some(DisplayField::Text(s)) => s,
        Some(DisplayField::Number(n)) => n.to_string(),
        Some(DisplayField::Object { display }) => display.unwrap_or_default(),
        None => String::new(),
    })
}
