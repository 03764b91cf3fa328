use std::cmp::Ordering;

use crate::models::{effective_score, Job};

/// Orders jobs by fit score, highest first.
///
/// Missing or non-finite scores sort as 0. The sort is stable, so jobs with equal
/// effective scores keep the order the server sent them in.
pub fn reconcile(mut jobs: Vec<Job>) -> Vec<Job> {
    jobs.sort_by(|a, b| by_score_desc(a, b));
    jobs
}

fn by_score_desc(a: &Job, b: &Job) -> Ordering {
    let a = effective_score(a.fit_score.as_ref());
    let b = effective_score(b.fit_score.as_ref());
    b.total_cmp(&a)
}
