use serde::{Deserialize, Serialize};

/// Account role. Exactly one per user; decides which command set is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "jobseeker", alias = "job-seeker", alias = "job_seeker", alias = "seeker")]
    JobSeeker,
    #[serde(rename = "hirer", alias = "recruiter")]
    Hirer,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::JobSeeker => "job seeker",
            Role::Hirer => "hirer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, alias = "resume")]
    pub resume_id: Option<String>,
}

impl User {
    pub fn has_resume(&self) -> bool {
        self.resume_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}
