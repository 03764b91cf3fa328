pub mod application;
pub mod fit_score;
pub mod hirer;
pub mod interview;
pub mod job;
pub mod user;

pub use application::{Application, ApplicationStatus, JobRef};
pub use fit_score::{effective_score, FitScore, FitScoreDetail, MatchTier};
pub use hirer::{AiRecommendation, Candidate, HirerJob, HiringDecision, ResumeAnalysis};
pub use interview::InterviewPrepGuide;
pub use job::{Job, JobPage, Pagination};
pub use user::{Role, User};
