//! Display projections for the CLI.
//!
//! Views never see raw payloads: they take decoded models plus a `Viewer`, and the
//! resume gate is enforced here. A viewer without a resume gets no fit badge at all,
//! whatever the server sent.

use std::fmt;

use crate::interview_prep::{PrepState, PREP_STEPS};
use crate::models::{
    AiRecommendation, Application, Candidate, FitScore, HirerJob, InterviewPrepGuide, Job,
    MatchTier, ResumeAnalysis,
};
use crate::recommendations::RecommendationSet;
use crate::store::Viewer;

/// The fit badge on a job card.
#[derive(Debug, Clone, PartialEq)]
pub enum FitBadge {
    Scored { percentage: u8, tier: MatchTier },
    /// The viewer has a resume but this job has not been scored yet.
    Pending,
}

impl FitBadge {
    fn from_score(score: Option<&FitScore>) -> Self {
        match score.map(FitScore::overall).filter(|s| s.is_finite()) {
            Some(overall) => {
                let tier = score.map(FitScore::tier).unwrap_or(MatchTier::Unknown);
                FitBadge::Scored {
                    percentage: overall.round().clamp(0.0, 100.0) as u8,
                    tier,
                }
            }
            None => FitBadge::Pending,
        }
    }
}

impl fmt::Display for FitBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitBadge::Scored { percentage, tier } => {
                write!(f, "{percentage}% match ({})", tier.label())
            }
            FitBadge::Pending => write!(f, "fit score pending"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobCard {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub work_mode: String,
    pub skills: Vec<String>,
    pub fit: Option<FitBadge>,
}

impl JobCard {
    pub fn from_job(job: &Job, viewer: &Viewer) -> Self {
        let fit = viewer
            .has_resume
            .then(|| FitBadge::from_score(job.fit_score.as_ref()));
        Self {
            id: job.id.clone(),
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            salary: job.salary.clone(),
            work_mode: job.work_mode.clone(),
            skills: job.skills.clone(),
            fit,
        }
    }
}

impl fmt::Display for JobCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} at {}", self.id, self.title, self.company)?;
        if let Some(fit) = &self.fit {
            write!(f, "  {fit}")?;
        }
        let details: Vec<&str> = [&self.location, &self.work_mode, &self.salary]
            .into_iter()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .collect();
        if !details.is_empty() {
            write!(f, "\n    {}", details.join(" | "))?;
        }
        if !self.skills.is_empty() {
            write!(f, "\n    skills: {}", self.skills.join(", "))?;
        }
        Ok(())
    }
}

/// Job details plus the full score breakdown, when the viewer may see it.
pub struct JobDetail<'a> {
    pub card: JobCard,
    pub job: &'a Job,
    pub show_breakdown: bool,
}

impl<'a> JobDetail<'a> {
    pub fn new(job: &'a Job, viewer: &Viewer) -> Self {
        Self {
            card: JobCard::from_job(job, viewer),
            job,
            show_breakdown: viewer.has_resume,
        }
    }
}

impl fmt::Display for JobDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.card)?;
        if !self.job.experience.is_empty() {
            writeln!(f, "    experience: {}", self.job.experience)?;
        }
        if !self.job.job_type.is_empty() {
            writeln!(f, "    type: {}", self.job.job_type)?;
        }
        let detail = self.job.fit_score.as_ref().and_then(FitScore::detail);
        if let (true, Some(detail)) = (self.show_breakdown, detail) {
            for (category, value) in &detail.breakdown {
                writeln!(f, "    {category}: {value:.0}%")?;
            }
            if !detail.strengths.is_empty() {
                writeln!(f, "    strengths: {}", detail.strengths.join("; "))?;
            }
            if !detail.gaps.is_empty() {
                writeln!(f, "    gaps: {}", detail.gaps.join("; "))?;
            }
        }
        if !self.job.description.is_empty() {
            write!(f, "\n{}", self.job.description)?;
        }
        Ok(())
    }
}

/// Summary of a reconciled recommendation set.
pub struct Dashboard {
    pub cards: Vec<JobCard>,
    pub banner: Option<String>,
    pub has_resume: bool,
}

impl Dashboard {
    pub fn new(set: &RecommendationSet, viewer: &Viewer) -> Self {
        let banner = set.is_calculating.then(|| {
            format!(
                "Fit scores are still being calculated ({}/{} jobs scored). Check back shortly.",
                set.cached_count, set.total_count
            )
        });
        Self {
            cards: set.jobs.iter().map(|j| JobCard::from_job(j, viewer)).collect(),
            banner,
            has_resume: viewer.has_resume,
        }
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_resume {
            return write!(
                f,
                "Upload your resume to see personalised recommendations (jobboard upload-resume <file>)."
            );
        }
        if let Some(banner) = &self.banner {
            writeln!(f, "{banner}\n")?;
        }
        if self.cards.is_empty() {
            return write!(f, "No recommendations yet.");
        }
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{card}")?;
        }
        Ok(())
    }
}

pub struct ApplicationRow<'a>(pub &'a Application);

impl fmt::Display for ApplicationRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.0;
        let title = match a.job_title() {
            "" => a.job.id(),
            title => title,
        };
        write!(f, "[{}] {title}", a.id)?;
        if !a.company().is_empty() {
            write!(f, " at {}", a.company())?;
        }
        write!(
            f,
            "  {}  applied {}",
            a.status.as_str(),
            a.applied_at.format("%Y-%m-%d")
        )
    }
}

pub struct HirerJobRow<'a>(pub &'a HirerJob);

impl fmt::Display for HirerJobRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.0;
        let noun = if h.applicant_count == 1 { "applicant" } else { "applicants" };
        write!(
            f,
            "[{}] {} at {}  {} {noun}",
            h.job.id, h.job.title, h.job.company, h.applicant_count
        )
    }
}

/// Hirers always see candidate scores; the resume gate applies to job seekers only.
pub struct CandidateRow<'a>(pub &'a Candidate);

impl fmt::Display for CandidateRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.0;
        write!(f, "[{}] {} <{}>  {}", c.application_id, c.name, c.email, c.status.as_str())?;
        match &c.fit_score {
            Some(score) => write!(f, "  {}", FitBadge::from_score(Some(score))),
            None => write!(f, "  not scored"),
        }
    }
}

pub struct AnalysisView<'a>(pub &'a ResumeAnalysis);

impl fmt::Display for AnalysisView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.0;
        match &a.ats_analysis {
            Some(ats) => writeln!(f, "ATS score: {:.0}", ats.score)?,
            None => writeln!(f, "ATS score: n/a")?,
        }
        match &a.project_analysis {
            Some(projects) => write!(f, "Project score: {:.0}", projects.score),
            None => write!(f, "Project score: n/a"),
        }
    }
}

pub struct RecommendationView<'a>(pub &'a AiRecommendation);

impl fmt::Display for RecommendationView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        writeln!(
            f,
            "{} (confidence {:.0}%)",
            r.recommendation.label(),
            r.confidence_score
        )?;
        if !r.reasoning.is_empty() {
            writeln!(f, "{}", r.reasoning)?;
        }
        for (label, items) in [
            ("Key factors", &r.key_factors),
            ("Strengths", &r.strengths),
            ("Concerns", &r.concerns),
        ] {
            if !items.is_empty() {
                writeln!(f, "{label}: {}", items.join("; "))?;
            }
        }
        if !r.suggestion.is_empty() {
            write!(f, "Suggestion: {}", r.suggestion)?;
        }
        Ok(())
    }
}

/// One progress line: "[3/6] Mapping interview rounds".
pub fn progress_line(state: &PrepState) -> Option<String> {
    match state {
        PrepState::Loading { step } => state
            .step_label()
            .map(|label| format!("[{}/{}] {label}...", step + 1, PREP_STEPS.len())),
        _ => None,
    }
}

pub struct GuideView<'a>(pub &'a InterviewPrepGuide);

impl fmt::Display for GuideView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = self.0;
        if let Some(level) = &g.role_level {
            writeln!(f, "Role level: {level}")?;
        }
        if let Some(info) = &g.company_info {
            writeln!(f, "\n{info}")?;
        }
        if let Some(rounds) = &g.interview_rounds {
            writeln!(f, "\nInterview rounds ({})", rounds.total_rounds)?;
            for round in &rounds.rounds {
                write!(f, "  {}. {}", round.round_number, round.name)?;
                if let Some(kind) = &round.round_type {
                    write!(f, " [{kind}]")?;
                }
                writeln!(f)?;
                for tip in &round.tips {
                    writeln!(f, "     - {tip}")?;
                }
            }
        }
        if !g.common_questions.is_empty() {
            writeln!(f, "\nCommon questions")?;
            for q in &g.common_questions {
                writeln!(f, "  - {}", q.question)?;
                if let Some(answer) = &q.how_to_answer {
                    writeln!(f, "    {answer}")?;
                }
            }
        }
        if !g.questions_to_ask.is_empty() {
            writeln!(f, "\nQuestions to ask")?;
            for q in &g.questions_to_ask {
                writeln!(f, "  - {}", q.question)?;
            }
        }
        if !g.interview_links.is_empty() {
            writeln!(f, "\nFurther reading")?;
            for link in &g.interview_links {
                writeln!(f, "  {} {}", link.title, link.url)?;
            }
        }
        Ok(())
    }
}
