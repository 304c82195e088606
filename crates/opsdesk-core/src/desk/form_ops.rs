//! Technician completion form.
//!
//! Technicians reach the form through a bearer token generated with the job.
//! The token is the only credential: an unknown token is rejected without
//! saying whether any job exists, and a form can be submitted once.

use jiff::{civil::Date, Timestamp, Zoned};
use serde::Serialize;

use super::{job_ops::log_events, Desk};
use crate::{
    automation::{self, AutomationOutcome},
    error::{DeskError, Result},
    events::{self, JobEvent},
    models::{CompletionStatus, Job, JobStatus},
    params::{SubmitCompletionForm, Token},
};

/// What a technician sees when opening the form. Carries no internal
/// identifiers and nothing about clients or pricing.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CompletionFormView {
    pub job_number: String,
    pub model_name: String,
    pub target_date: Option<Date>,
    pub capture_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub already_submitted: bool,
}

impl From<&Job> for CompletionFormView {
    fn from(job: &Job) -> Self {
        Self {
            job_number: job.job_number.clone(),
            model_name: job.model_name.clone(),
            target_date: job.target_date,
            capture_address: job.capture_address.clone(),
            city: job.city.clone(),
            state: job.state.clone(),
            already_submitted: job.completion_form_submitted,
        }
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct FormSubmission {
    /// The job as saved
    pub job: Job,
    /// Checklist steps completed on the technician's behalf
    pub automation: AutomationOutcome,
    /// Notifications implied by the report
    pub events: Vec<JobEvent>,
}

impl Desk {
    /// Opens the completion form for a token.
    pub async fn completion_form(&self, params: &Token) -> Result<CompletionFormView> {
        let token = params.token.clone();
        self.with_db(move |db| match db.find_job_by_token(&token)? {
            Some(job) => Ok(CompletionFormView::from(&job)),
            None => {
                log::warn!("Rejected completion form request with unknown token");
                Err(DeskError::TokenNotFound)
            }
        })
        .await
    }

    /// Records a technician's completion report.
    ///
    /// A `completed` report moves the job to `scanned` and completes the
    /// first scan and upload steps of its saved checklist. Jobs without a
    /// saved checklist are left without one. Everything is written in one
    /// transaction.
    pub async fn submit_completion_form(
        &self,
        params: &SubmitCompletionForm,
    ) -> Result<FormSubmission> {
        let report = params.submission.validate()?;
        let token = params.token.clone();

        let (previous, job, automation) = self
            .with_db(move |db| {
                let Some(previous) = db.find_job_by_token(&token)? else {
                    log::warn!("Rejected completion form submission with unknown token");
                    return Err(DeskError::TokenNotFound);
                };
                if previous.completion_form_submitted {
                    log::warn!(
                        "Rejected repeat completion form submission for job {}",
                        previous.id
                    );
                    return Err(DeskError::FormAlreadySubmitted);
                }

                let now = Timestamp::now();
                let mut job = previous.clone();
                let tech_email = job.tech_email().map(String::from);
                let automation = automation::apply_completion_rule(
                    &mut job.workflow_steps,
                    report.completion_status,
                    tech_email.as_deref(),
                    now,
                );

                job.completion_status = Some(report.completion_status);
                job.incompletion_reason = report.incompletion_reason;
                job.incompletion_notes = report.incompletion_notes;
                job.tech_feedback = report.tech_feedback;
                job.scanned_date = report.scanned_date;
                job.completion_form_submitted = true;
                if report.completion_status == CompletionStatus::Completed {
                    job.status = JobStatus::Scanned;
                }
                job.updated_at = now;

                db.apply_completion(&job)?;
                Ok((previous, job, automation))
            })
            .await?;

        log::info!(
            "Completion form submitted for job {} ({})",
            job.job_number,
            report_label(&job)
        );
        if !automation.is_empty() {
            log::info!(
                "Auto-completed steps {:?} of job {}",
                automation.completed_indices,
                job.job_number
            );
        }

        let events = events::detect(&previous, &job, Zoned::now().date());
        log_events(&events);

        Ok(FormSubmission {
            job,
            automation,
            events,
        })
    }
}

fn report_label(job: &Job) -> &'static str {
    job.completion_status.map_or("no status", |s| s.as_str())
}
