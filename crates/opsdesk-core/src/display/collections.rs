//! Collection wrappers with empty-collection handling.

use std::{fmt, ops::Index};

use crate::{
    catalog::WorkflowTemplate,
    models::{Client, JobSummary, Technician},
};

/// Job summaries for list screens.
///
/// # Examples
///
/// ```rust
/// use opsdesk_core::{display::Jobs, models::JobSummary};
///
/// let jobs = Jobs(Vec::<JobSummary>::new());
/// assert!(jobs.is_empty());
/// assert_eq!(jobs.to_string(), "No jobs found.\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Jobs(pub Vec<JobSummary>);

impl Jobs {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&JobSummary> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JobSummary> {
        self.0.iter()
    }
}

impl Index<usize> for Jobs {
    type Output = JobSummary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for Jobs {
    type Item = JobSummary;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Jobs {
    type Item = &'a JobSummary;
    type IntoIter = std::slice::Iter<'a, JobSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Jobs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No jobs found.");
        }
        for job in &self.0 {
            write!(f, "{job}")?;
        }
        Ok(())
    }
}

/// The workflow catalog, one line per template.
#[derive(Debug, Clone, Copy)]
pub struct Templates(pub &'static [WorkflowTemplate]);

impl fmt::Display for Templates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No workflow templates.");
        }
        for template in self.0 {
            writeln!(
                f,
                "- **{}** `{}` ({} steps): {}",
                template.name,
                template.id,
                template.steps.len(),
                template.description
            )?;
        }
        Ok(())
    }
}

/// Registered technicians.
#[derive(Debug, Clone, Default)]
pub struct Technicians(pub Vec<Technician>);

impl fmt::Display for Technicians {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No technicians registered.");
        }
        for tech in &self.0 {
            writeln!(f, "- {tech}")?;
        }
        Ok(())
    }
}

/// Registered clients.
#[derive(Debug, Clone, Default)]
pub struct Clients(pub Vec<Client>);

impl fmt::Display for Clients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No clients registered.");
        }
        for client in &self.0 {
            writeln!(f, "- {client}")?;
        }
        Ok(())
    }
}
