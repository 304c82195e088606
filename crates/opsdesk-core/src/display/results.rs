//! Result wrappers for create and update operations.

use std::fmt;

use super::status::Notifications;
use crate::{
    desk::{FormSubmission, StatusChange},
    models::{Client, Job, Technician},
};

/// Confirms a newly created resource and shows it.
///
/// # Examples
///
/// ```rust
/// use opsdesk_core::{display::CreateResult, models::Technician};
///
/// let tech = Technician {
///     id: 2,
///     name: "Riley".to_string(),
///     email: "riley@example.com".to_string(),
/// };
/// let output = CreateResult::new(tech).to_string();
/// assert!(output.starts_with("Registered technician with ID: 2"));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Job> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created job with ID: {}", self.resource.id)?;
        if let Some(token) = &self.resource.completion_token {
            writeln!(f, "Completion form token: `{token}`")?;
        }
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<Technician> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Registered technician with ID: {}", self.resource.id)?;
        writeln!(f)?;
        writeln!(f, "- {}", self.resource)
    }
}

impl fmt::Display for CreateResult<Client> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Registered client with ID: {}", self.resource.id)?;
        writeln!(f)?;
        writeln!(f, "- {}", self.resource)
    }
}

/// Confirms an update to a job, listing what changed.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl fmt::Display for UpdateResult<Job> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated job with ID: {}", self.resource.id)?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for StatusChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Job {} is now {}",
            self.job.job_number, self.job.status
        )?;
        writeln!(f)?;
        write!(f, "{}", Notifications(&self.events))
    }
}

impl fmt::Display for FormSubmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Completion form submitted for job {}",
            self.job.job_number
        )?;
        writeln!(f)?;

        if self.automation.is_empty() {
            writeln!(f, "No checklist steps were completed automatically.")?;
        } else {
            writeln!(f, "Completed automatically:")?;
            for &index in &self.automation.completed_indices {
                if let Some(step) = self.job.workflow_steps.get(index) {
                    writeln!(f, "- **{index}** {}", step.step_name)?;
                }
            }
        }
        writeln!(f)?;
        write!(f, "{}", Notifications(&self.events))
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::{models::JobStatus, progress};

    fn job() -> Job {
        Job {
            id: 8,
            job_number: "J-8".to_string(),
            model_name: "Mill".to_string(),
            client_id: None,
            tech: None,
            status: JobStatus::Request,
            completion_status: None,
            incompletion_reason: None,
            incompletion_notes: None,
            tech_feedback: None,
            scanned_date: None,
            target_date: None,
            capture_address: None,
            city: None,
            state: None,
            workflow_type: None,
            workflow_steps: vec![],
            completion_token: Some("ab".repeat(32)),
            completion_form_submitted: false,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_create_result_shows_token() {
        let output = CreateResult::new(job()).to_string();
        assert!(output.starts_with("Created job with ID: 8"));
        assert!(output.contains(&"ab".repeat(32)));
    }

    #[test]
    fn test_update_result_lists_changes() {
        let output =
            UpdateResult::with_changes(job(), vec!["Toggled step 0".to_string()]).to_string();
        assert!(output.contains("Changes made:\n- Toggled step 0"));
        assert!(output.contains("# 8. J-8: Mill"));
    }

    #[test]
    fn test_form_submission_lists_automated_steps() {
        let mut job = job();
        job.workflow_steps = progress::generate_steps("outsourced-scan-upload-client");
        let submission = FormSubmission {
            job,
            automation: crate::automation::AutomationOutcome {
                completed_indices: vec![0, 1],
            },
            events: vec![],
        };

        let output = submission.to_string();
        assert!(output.contains("- **0** Scan Completed"));
        assert!(output.contains("- **1** Upload to Client Account"));
        assert!(!output.contains("Notifications"));
    }
}
