//! Parameter structures for desk operations.
//!
//! These structures are shared by every interface (CLI, MCP) and carry no
//! framework-specific derives beyond serde. Interface layers wrap them:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   MCP Params    │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! JSON schema generation is only compiled in with the `schema` feature.
//!
//! Values that need parsing (statuses, dates) travel as strings and are
//! validated by the `validate` methods here, so every interface reports the
//! same errors.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    catalog,
    error::{DeskError, Result},
    models::{CompletionStatus, IncompletionReason, JobStatus},
};

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for looking up a workflow template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct WorkflowLookup {
    /// Workflow type id, e.g. "direct-scan-hosted"
    pub workflow_type: String,
}

/// Parameters for creating a new job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateJob {
    /// Business-facing job number (required)
    pub job_number: String,
    /// Name of the model or property being captured (required)
    pub model_name: String,
    /// Ordering client; its default workflow applies when none is given
    #[serde(default)]
    pub client_id: Option<u64>,
    /// Workflow type id from the catalog
    #[serde(default)]
    pub workflow_type: Option<String>,
    /// Scheduled capture date, YYYY-MM-DD
    #[serde(default)]
    pub target_date: Option<String>,
    /// Street address of the site
    #[serde(default)]
    pub capture_address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl CreateJob {
    /// Validates required fields, the workflow type and the target date.
    pub fn validate(&self) -> Result<Option<jiff::civil::Date>> {
        if self.job_number.trim().is_empty() {
            return Err(DeskError::invalid_input("job_number").with_reason("Job number is required"));
        }
        if self.model_name.trim().is_empty() {
            return Err(DeskError::invalid_input("model_name").with_reason("Model name is required"));
        }
        if let Some(workflow_type) = &self.workflow_type {
            ensure_known_workflow(workflow_type)?;
        }
        self.target_date
            .as_deref()
            .map(|d| parse_date("target_date", d))
            .transpose()
    }
}

/// Parameters for listing jobs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListJobs {
    /// Only jobs in this status (request, scheduled, scanned, qc, done, archived)
    #[serde(default)]
    pub status: Option<String>,
    /// Only jobs with this workflow type
    #[serde(default)]
    pub workflow_type: Option<String>,
    /// Only jobs assigned to this technician
    #[serde(default)]
    pub tech_id: Option<u64>,
    /// Include archived jobs
    #[serde(default)]
    pub include_archived: bool,
}

/// Parameters for changing a job's lifecycle status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateStatus {
    /// Job ID
    pub id: u64,
    /// New status (request, scheduled, scanned, qc, done, archived)
    pub status: String,
}

impl UpdateStatus {
    /// Parses the requested status.
    pub fn validate(&self) -> Result<JobStatus> {
        self.status
            .parse()
            .map_err(|reason: String| DeskError::invalid_input("status").with_reason(reason))
    }
}

/// Parameters for assigning or unassigning a technician.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AssignTech {
    /// Job ID
    pub id: u64,
    /// Technician ID; omit to unassign
    #[serde(default)]
    pub tech_id: Option<u64>,
}

/// Parameters for choosing a job's workflow.
///
/// Choosing a workflow replaces the job's checklist with a fresh one; existing
/// progress is discarded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SetWorkflow {
    /// Job ID
    pub id: u64,
    /// Workflow type id; omit to clear the workflow
    #[serde(default)]
    pub workflow_type: Option<String>,
}

impl SetWorkflow {
    /// Ensures the workflow type, if any, is in the catalog.
    pub fn validate(&self) -> Result<()> {
        match &self.workflow_type {
            Some(workflow_type) => ensure_known_workflow(workflow_type),
            None => Ok(()),
        }
    }
}

/// Parameters for toggling one checklist step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ToggleStep {
    /// Job ID
    pub id: u64,
    /// 0-based position of the step in the checklist
    pub index: usize,
    /// Who is toggling the step, usually an email
    pub completed_by: String,
}

/// Parameters for registering a technician.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateTechnician {
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
}

impl CreateTechnician {
    /// Checks that both fields are present and the email looks like one.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(DeskError::invalid_input("name").with_reason("Name is required"));
        }
        if !self.email.contains('@') {
            return Err(DeskError::invalid_input("email")
                .with_reason(format!("'{}' is not an email address", self.email)));
        }
        Ok(())
    }
}

/// Parameters for registering a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateClient {
    /// Company or contact name
    pub name: String,
    /// Workflow type given to the client's new jobs
    #[serde(default)]
    pub default_workflow: Option<String>,
}

impl CreateClient {
    /// Checks the name and the default workflow.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(DeskError::invalid_input("name").with_reason("Name is required"));
        }
        if let Some(workflow_type) = &self.default_workflow {
            ensure_known_workflow(workflow_type)?;
        }
        Ok(())
    }
}

/// A technician's completion report, submitted through the token form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CompletionSubmission {
    /// completed, partially-completed or not-completed
    pub completion_status: String,
    /// no-access, poc-no-show, poc-reschedule or other
    #[serde(default)]
    pub incompletion_reason: Option<String>,
    /// Explanation for an unfinished capture
    #[serde(default)]
    pub incompletion_notes: Option<String>,
    /// Free-text feedback from the technician
    #[serde(default)]
    pub tech_feedback: Option<String>,
    /// Date of the capture, YYYY-MM-DD
    #[serde(default)]
    pub scanned_date: Option<String>,
}

/// A [`CompletionSubmission`] with every field parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCompletion {
    pub completion_status: CompletionStatus,
    pub incompletion_reason: Option<IncompletionReason>,
    pub incompletion_notes: Option<String>,
    pub tech_feedback: Option<String>,
    pub scanned_date: Option<jiff::civil::Date>,
}

impl CompletionSubmission {
    /// Parses the submission. Blank optional text fields become `None`.
    ///
    /// ```rust
    /// use opsdesk_core::{models::CompletionStatus, params::CompletionSubmission};
    ///
    /// let submission = CompletionSubmission {
    ///     completion_status: "completed".to_string(),
    ///     incompletion_reason: None,
    ///     incompletion_notes: Some("".to_string()),
    ///     tech_feedback: Some("Smooth visit".to_string()),
    ///     scanned_date: Some("2026-01-15".to_string()),
    /// };
    /// let valid = submission.validate()?;
    /// assert_eq!(valid.completion_status, CompletionStatus::Completed);
    /// assert_eq!(valid.incompletion_notes, None);
    /// # Ok::<(), opsdesk_core::DeskError>(())
    /// ```
    pub fn validate(&self) -> Result<ValidCompletion> {
        let completion_status = self
            .completion_status
            .parse::<CompletionStatus>()
            .map_err(|reason| DeskError::invalid_input("completion_status").with_reason(reason))?;

        let incompletion_reason = non_blank(&self.incompletion_reason)
            .map(|r| {
                r.parse::<IncompletionReason>().map_err(|reason| {
                    DeskError::invalid_input("incompletion_reason").with_reason(reason)
                })
            })
            .transpose()?;

        let scanned_date = non_blank(&self.scanned_date)
            .map(|d| parse_date("scanned_date", d))
            .transpose()?;

        Ok(ValidCompletion {
            completion_status,
            incompletion_reason,
            incompletion_notes: non_blank(&self.incompletion_notes).map(String::from),
            tech_feedback: non_blank(&self.tech_feedback).map(String::from),
            scanned_date,
        })
    }
}

/// Parameters for opening the completion form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Token {
    /// Completion-form token sent to the technician
    pub token: String,
}

/// Parameters for submitting the completion form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SubmitCompletionForm {
    /// Completion-form token sent to the technician
    pub token: String,
    #[serde(flatten)]
    pub submission: CompletionSubmission,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn parse_date(field: &str, value: &str) -> Result<jiff::civil::Date> {
    value.parse().map_err(|e| {
        DeskError::invalid_input(field).with_reason(format!("'{value}' is not a YYYY-MM-DD date: {e}"))
    })
}

fn ensure_known_workflow(workflow_type: &str) -> Result<()> {
    if catalog::is_known(workflow_type) {
        Ok(())
    } else {
        Err(DeskError::UnknownWorkflowType {
            workflow_type: workflow_type.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(status: &str) -> CompletionSubmission {
        CompletionSubmission {
            completion_status: status.to_string(),
            incompletion_reason: None,
            incompletion_notes: None,
            tech_feedback: None,
            scanned_date: None,
        }
    }

    #[test]
    fn test_create_job_requires_number_and_name() {
        let params = CreateJob {
            job_number: " ".to_string(),
            model_name: "Office".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(DeskError::InvalidInput { ref field, .. }) if field == "job_number"
        ));
    }

    #[test]
    fn test_create_job_rejects_unknown_workflow() {
        let params = CreateJob {
            job_number: "J-1".to_string(),
            model_name: "Office".to_string(),
            workflow_type: Some("scan-everything".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(DeskError::UnknownWorkflowType { .. })
        ));
    }

    #[test]
    fn test_create_job_parses_target_date() {
        let params = CreateJob {
            job_number: "J-1".to_string(),
            model_name: "Office".to_string(),
            target_date: Some("2026-04-01".to_string()),
            ..Default::default()
        };
        assert_eq!(params.validate().unwrap(), Some(jiff::civil::date(2026, 4, 1)));

        let bad = CreateJob {
            target_date: Some("April 1st".to_string()),
            ..params
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_update_status_validate() {
        let params = UpdateStatus {
            id: 1,
            status: "qc".to_string(),
        };
        assert_eq!(params.validate().unwrap(), JobStatus::Qc);

        let params = UpdateStatus {
            id: 1,
            status: "finished".to_string(),
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_set_workflow_validate() {
        let clear = SetWorkflow {
            id: 1,
            workflow_type: None,
        };
        assert!(clear.validate().is_ok());

        let unknown = SetWorkflow {
            id: 1,
            workflow_type: Some("nope".to_string()),
        };
        assert!(unknown.validate().is_err());
    }

    #[test]
    fn test_completion_submission_rejects_bad_status() {
        assert!(submission("done").validate().is_err());
        assert!(submission("not-completed").validate().is_ok());
    }

    #[test]
    fn test_completion_submission_parses_reason_and_date() {
        let mut params = submission("not-completed");
        params.incompletion_reason = Some("poc-reschedule".to_string());
        params.scanned_date = Some("".to_string());

        let valid = params.validate().unwrap();
        assert_eq!(valid.incompletion_reason, Some(IncompletionReason::PocReschedule));
        assert_eq!(valid.scanned_date, None);

        params.incompletion_reason = Some("weather".to_string());
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_create_technician_validate() {
        let ok = CreateTechnician {
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = CreateTechnician {
            email: "sam".to_string(),
            ..ok
        };
        assert!(bad.validate().is_err());
    }
}
