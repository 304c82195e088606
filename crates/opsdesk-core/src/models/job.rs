//! Job model definition and related functionality.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::{CompletionStatus, IncompletionReason, JobStatus, Technician};
use crate::progress::WorkflowStepProgress;

/// Reference to the technician assigned to a job.
///
/// Records may carry either the bare technician id or the expanded
/// technician, depending on how they were loaded. Both shapes deserialize.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TechRef {
    /// Only the technician id is known
    Id(u64),
    /// The full technician record
    Expanded(Technician),
}

impl TechRef {
    /// Technician id regardless of shape.
    pub fn id(&self) -> u64 {
        match self {
            TechRef::Id(id) => *id,
            TechRef::Expanded(tech) => tech.id,
        }
    }

    /// Technician email, only available when expanded.
    pub fn email(&self) -> Option<&str> {
        match self {
            TechRef::Id(_) => None,
            TechRef::Expanded(tech) => Some(tech.email.as_str()),
        }
    }

    /// The expanded technician, if loaded.
    pub fn technician(&self) -> Option<&Technician> {
        match self {
            TechRef::Id(_) => None,
            TechRef::Expanded(tech) => Some(tech),
        }
    }
}

impl From<Technician> for TechRef {
    fn from(tech: Technician) -> Self {
        TechRef::Expanded(tech)
    }
}

/// A scanning job: the aggregate that owns its workflow progress.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    /// Unique identifier for the job
    pub id: u64,

    /// Business-facing job number
    pub job_number: String,

    /// Name of the model or property being captured
    pub model_name: String,

    /// Ordering client, if any
    #[serde(default)]
    pub client_id: Option<u64>,

    /// Assigned technician
    #[serde(default)]
    pub tech: Option<TechRef>,

    /// Lifecycle status
    #[serde(default)]
    pub status: JobStatus,

    /// Outcome reported on the completion form
    #[serde(default)]
    pub completion_status: Option<CompletionStatus>,

    /// Reason given when the capture was not completed
    #[serde(default)]
    pub incompletion_reason: Option<IncompletionReason>,

    /// Free-text explanation for an incomplete capture
    #[serde(default)]
    pub incompletion_notes: Option<String>,

    /// Feedback left by the technician
    #[serde(default)]
    pub tech_feedback: Option<String>,

    /// Date the capture happened
    #[serde(default)]
    pub scanned_date: Option<Date>,

    /// Scheduled capture date
    #[serde(default)]
    pub target_date: Option<Date>,

    /// Street address of the site
    #[serde(default)]
    pub capture_address: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub state: Option<String>,

    /// Catalog key selecting the workflow template
    #[serde(default)]
    pub workflow_type: Option<String>,

    /// Persisted checklist progress, in template order
    #[serde(default)]
    pub workflow_steps: Vec<WorkflowStepProgress>,

    /// Bearer token for the technician completion form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_token: Option<String>,

    /// Whether the completion form was already submitted
    #[serde(default)]
    pub completion_form_submitted: bool,

    /// Timestamp when the job was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the job was last modified (UTC)
    pub updated_at: Timestamp,
}

impl Job {
    /// Email of the assigned technician, when it has been loaded.
    pub fn tech_email(&self) -> Option<&str> {
        self.tech.as_ref().and_then(TechRef::email)
    }

    /// Whether the job names a workflow but has no persisted steps yet.
    pub fn needs_backfill(&self) -> bool {
        self.workflow_steps.is_empty()
            && self
                .workflow_type
                .as_deref()
                .is_some_and(crate::catalog::is_known)
    }

    /// Whether the target date has passed as of `today`.
    pub fn is_past_target(&self, today: Date) -> bool {
        self.target_date.is_some_and(|target| today > target)
    }
}
