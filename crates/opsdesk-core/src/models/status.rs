//! Status enumerations for jobs and completion reports.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Requested by a client, not yet scheduled
    #[default]
    Request,
    /// Scheduled with a technician
    Scheduled,
    /// Captured on site
    Scanned,
    /// In quality control
    Qc,
    /// Delivered and approved
    Done,
    /// Hidden from normal views
    Archived,
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "request" => Ok(JobStatus::Request),
            "scheduled" => Ok(JobStatus::Scheduled),
            "scanned" => Ok(JobStatus::Scanned),
            "qc" => Ok(JobStatus::Qc),
            "done" => Ok(JobStatus::Done),
            "archived" => Ok(JobStatus::Archived),
            _ => Err(format!("Invalid job status: {s}")),
        }
    }
}

impl JobStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Request => "request",
            JobStatus::Scheduled => "scheduled",
            JobStatus::Scanned => "scanned",
            JobStatus::Qc => "qc",
            JobStatus::Done => "done",
            JobStatus::Archived => "archived",
        }
    }

    /// All statuses in lifecycle order.
    pub const ALL: [JobStatus; 6] = [
        JobStatus::Request,
        JobStatus::Scheduled,
        JobStatus::Scanned,
        JobStatus::Qc,
        JobStatus::Done,
        JobStatus::Archived,
    ];
}

/// Outcome reported by the technician on the completion form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum CompletionStatus {
    Completed,
    PartiallyCompleted,
    NotCompleted,
}

impl FromStr for CompletionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "completed" => Ok(CompletionStatus::Completed),
            "partially-completed" => Ok(CompletionStatus::PartiallyCompleted),
            "not-completed" => Ok(CompletionStatus::NotCompleted),
            _ => Err(format!("Invalid completion status: {s}")),
        }
    }
}

impl CompletionStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionStatus::Completed => "completed",
            CompletionStatus::PartiallyCompleted => "partially-completed",
            CompletionStatus::NotCompleted => "not-completed",
        }
    }

    /// Whether the report describes an unfinished capture.
    pub fn is_incomplete(&self) -> bool {
        !matches!(self, CompletionStatus::Completed)
    }
}

/// Why a capture could not be finished.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum IncompletionReason {
    NoAccess,
    PocNoShow,
    PocReschedule,
    Other,
}

impl FromStr for IncompletionReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "no-access" => Ok(IncompletionReason::NoAccess),
            "poc-no-show" => Ok(IncompletionReason::PocNoShow),
            "poc-reschedule" => Ok(IncompletionReason::PocReschedule),
            "other" => Ok(IncompletionReason::Other),
            _ => Err(format!("Invalid incompletion reason: {s}")),
        }
    }
}

impl IncompletionReason {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            IncompletionReason::NoAccess => "no-access",
            IncompletionReason::PocNoShow => "poc-no-show",
            IncompletionReason::PocReschedule => "poc-reschedule",
            IncompletionReason::Other => "other",
        }
    }

    /// Sentence used in notifications.
    pub fn describe(&self) -> &'static str {
        match self {
            IncompletionReason::NoAccess => "Unable to access location",
            IncompletionReason::PocNoShow => "POC did not show up",
            IncompletionReason::PocReschedule => "POC requested reschedule",
            IncompletionReason::Other => "Other reason",
        }
    }
}
