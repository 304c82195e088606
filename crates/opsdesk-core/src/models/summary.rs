//! Job summary types and functionality.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::{CompletionStatus, Job, JobStatus};
use crate::progress::{self, ProgressCounts};

/// Compact view of a job for list screens, with derived workflow progress.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobSummary {
    /// Job ID
    pub id: u64,
    /// Business-facing job number
    pub job_number: String,
    /// Model or property name
    pub model_name: String,
    /// Lifecycle status
    pub status: JobStatus,
    /// Technician report outcome
    pub completion_status: Option<CompletionStatus>,
    /// Name of the assigned technician, if any
    pub tech_name: Option<String>,
    /// Scheduled capture date
    pub target_date: Option<Date>,
    /// Catalog key of the workflow
    pub workflow_type: Option<String>,
    /// Completed and total step counts
    pub progress: ProgressCounts,
    /// Last update timestamp
    pub updated_at: Timestamp,
}

impl JobSummary {
    /// Whether the job has any workflow to report progress on.
    pub fn has_workflow(&self) -> bool {
        self.workflow_type.is_some() || self.progress.total > 0
    }

    /// Rounded completion percentage.
    pub fn percentage(&self) -> u8 {
        self.progress.percentage()
    }
}

impl From<&Job> for JobSummary {
    /// Summarises a job. Progress is computed over the materialised steps so
    /// that legacy jobs show the same checklist the detail view shows.
    fn from(job: &Job) -> Self {
        let steps = progress::materialize(job);

        Self {
            id: job.id,
            job_number: job.job_number.clone(),
            model_name: job.model_name.clone(),
            status: job.status,
            completion_status: job.completion_status,
            tech_name: job
                .tech
                .as_ref()
                .and_then(|t| t.technician())
                .map(|t| t.name.clone()),
            target_date: job.target_date,
            workflow_type: job.workflow_type.clone(),
            progress: ProgressCounts::of(&steps),
            updated_at: job.updated_at,
        }
    }
}
