//! Client-side text filter for the job, application and hirer-job lists.

use crate::models::{Application, HirerJob, Job};

/// Something a list filter can match against: a title and a company name.
pub trait Searchable {
    fn title(&self) -> &str;
    fn company(&self) -> &str;
}

impl Searchable for Job {
    fn title(&self) -> &str {
        &self.title
    }

    fn company(&self) -> &str {
        &self.company
    }
}

impl Searchable for Application {
    fn title(&self) -> &str {
        self.job_title()
    }

    fn company(&self) -> &str {
        Application::company(self)
    }
}

impl Searchable for HirerJob {
    fn title(&self) -> &str {
        &self.job.title
    }

    fn company(&self) -> &str {
        &self.job.company
    }
}

/// Case-insensitive substring match on title or company.
///
/// A blank query returns the whole list in its original order. Any other query is
/// matched as typed, surrounding whitespace included.
pub fn filter_by_text<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    if query.trim().is_empty() {
        return items.iter().collect();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| {
            item.title().to_lowercase().contains(&needle)
                || item.company().to_lowercase().contains(&needle)
        })
        .collect()
}
