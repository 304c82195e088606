//! Notification events derived from job transitions.
//!
//! The desk does not deliver notifications. It compares a job before and
//! after a write and reports which team should hear about it; an external
//! dispatcher fans the events out to users holding the recipient roles.

use std::fmt;

use jiff::civil::Date;
use serde::Serialize;

use crate::{
    catalog::Role,
    models::{CompletionStatus, IncompletionReason, Job, JobStatus},
};

/// Something a team should be told about.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum JobEvent {
    /// The technician reported the capture as completed
    ReadyForQc { job_id: u64, job_number: String },
    /// The technician reported the capture as unfinished
    Incomplete {
        job_id: u64,
        job_number: String,
        completion_status: CompletionStatus,
        reason: Option<IncompletionReason>,
    },
    /// The job moved while already past its target date
    Delayed {
        job_id: u64,
        job_number: String,
        target_date: Date,
    },
    /// QC approved the job
    ReadyForInvoicing { job_id: u64, job_number: String },
}

impl JobEvent {
    /// Roles whose members receive the event.
    pub fn recipients(&self) -> &'static [Role] {
        match self {
            JobEvent::ReadyForQc { .. } => &[Role::PostProducer],
            JobEvent::Incomplete { .. } | JobEvent::Delayed { .. } => {
                &[Role::SuperAdmin, Role::OpsManager]
            }
            JobEvent::ReadyForInvoicing { .. } => &[Role::SuperAdmin, Role::SalesAdmin],
        }
    }

    /// Short notification title.
    pub fn title(&self) -> &'static str {
        match self {
            JobEvent::ReadyForQc { .. } => "Job Ready for QC",
            JobEvent::Incomplete { .. } => "Job Incomplete",
            JobEvent::Delayed { .. } => "Job Delayed",
            JobEvent::ReadyForInvoicing { .. } => "Job Ready for Invoicing",
        }
    }

    /// Job the event is about.
    pub fn job_id(&self) -> u64 {
        match self {
            JobEvent::ReadyForQc { job_id, .. }
            | JobEvent::Incomplete { job_id, .. }
            | JobEvent::Delayed { job_id, .. }
            | JobEvent::ReadyForInvoicing { job_id, .. } => *job_id,
        }
    }
}

impl fmt::Display for JobEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobEvent::ReadyForQc { job_number, .. } => write!(
                f,
                "Job {job_number} has been marked as completed by the tech and is ready for quality control review."
            ),
            JobEvent::Incomplete {
                job_number,
                completion_status,
                reason,
                ..
            } => {
                let state = match completion_status {
                    CompletionStatus::NotCompleted => "not completed",
                    _ => "partially completed",
                };
                let reason = reason.map_or("Other reason", |r| r.describe());
                write!(f, "Job {job_number} was marked as {state}. Reason: {reason}.")
            }
            JobEvent::Delayed {
                job_number,
                target_date,
                ..
            } => write!(
                f,
                "Job {job_number} is past its scheduled date ({target_date}) and has not been completed yet."
            ),
            JobEvent::ReadyForInvoicing { job_number, .. } => write!(
                f,
                "Job {job_number} has been completed and approved by QC. It is now ready for invoicing."
            ),
        }
    }
}

/// Events implied by a job changing from `previous` to `current` as of
/// `today`.
pub fn detect(previous: &Job, current: &Job, today: Date) -> Vec<JobEvent> {
    let mut events = Vec::new();
    let job_id = current.id;
    let job_number = || current.job_number.clone();

    if previous.completion_status != Some(CompletionStatus::Completed)
        && current.completion_status == Some(CompletionStatus::Completed)
    {
        events.push(JobEvent::ReadyForQc {
            job_id,
            job_number: job_number(),
        });
    }

    if let Some(status) = current.completion_status.filter(CompletionStatus::is_incomplete) {
        if previous.completion_status != current.completion_status
            || previous.incompletion_reason != current.incompletion_reason
        {
            events.push(JobEvent::Incomplete {
                job_id,
                job_number: job_number(),
                completion_status: status,
                reason: current.incompletion_reason,
            });
        }
    }

    if let Some(target_date) = current.target_date {
        if current.status != JobStatus::Done
            && previous.status != current.status
            && current.is_past_target(today)
        {
            events.push(JobEvent::Delayed {
                job_id,
                job_number: job_number(),
                target_date,
            });
        }
    }

    if previous.status != JobStatus::Done && current.status == JobStatus::Done {
        events.push(JobEvent::ReadyForInvoicing {
            job_id,
            job_number: job_number(),
        });
    }

    events
}
