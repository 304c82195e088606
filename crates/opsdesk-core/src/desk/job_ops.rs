//! Job operations for the Desk.

use jiff::Zoned;

use super::{commit_generated_steps, load_job, BackfillPolicy, Desk};
use crate::{
    db::job_queries::NewJob,
    display::Jobs,
    error::{DeskError, Result},
    events::{self, JobEvent},
    models::{Job, JobFilter, JobSummary},
    params::{AssignTech, CreateJob, Id, ListJobs, UpdateStatus},
};

/// A job after a status change, with the notifications it triggers.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub job: Job,
    pub events: Vec<JobEvent>,
}

impl Desk {
    /// Creates a job.
    ///
    /// The workflow type falls back to the client's default. A job created
    /// with a catalog workflow gets its checklist committed immediately.
    pub async fn create_job(&self, params: &CreateJob) -> Result<Job> {
        let target_date = params.validate()?;
        let params = params.clone();

        let job = self
            .with_db(move |db| {
                db.create_job(&NewJob {
                    job_number: params.job_number.trim(),
                    model_name: params.model_name.trim(),
                    client_id: params.client_id,
                    workflow_type: params.workflow_type.as_deref(),
                    target_date,
                    capture_address: params.capture_address.as_deref(),
                    city: params.city.as_deref(),
                    state: params.state.as_deref(),
                })
            })
            .await?;

        log::info!(
            "Created job {} ({}) with workflow {}",
            job.id,
            job.job_number,
            job.workflow_type.as_deref().unwrap_or("none")
        );
        Ok(job)
    }

    /// Retrieves a job with its technician and saved checklist.
    ///
    /// Under [`BackfillPolicy::Eager`] a job without a saved checklist gets
    /// one committed here.
    pub async fn get_job(&self, params: &Id) -> Result<Job> {
        let id = params.id;
        let policy = self.backfill;
        log::debug!("Loading job {id}");
        self.with_db(move |db| load_job(db, id, policy)).await
    }

    /// Lists jobs matching the parameters, newest first.
    pub async fn list_jobs(&self, params: &ListJobs) -> Result<Vec<Job>> {
        let filter = JobFilter::try_from(params)?;
        let policy = self.backfill;

        self.with_db(move |db| {
            let mut jobs = db.list_jobs(&filter)?;
            if policy == BackfillPolicy::Eager {
                for job in &mut jobs {
                    commit_generated_steps(db, job)?;
                }
            }
            Ok(jobs)
        })
        .await
    }

    /// Lists jobs as summaries with derived progress.
    pub async fn list_job_summaries(&self, params: &ListJobs) -> Result<Jobs> {
        let jobs = self.list_jobs(params).await?;
        Ok(Jobs(jobs.iter().map(JobSummary::from).collect()))
    }

    /// Moves a job to a new lifecycle status.
    pub async fn update_status(&self, params: &UpdateStatus) -> Result<StatusChange> {
        let status = params.validate()?;
        let id = params.id;

        let (previous, job) = self
            .with_db(move |db| {
                let previous = db.get_job(id)?.ok_or(DeskError::JobNotFound { id })?;
                db.update_job_status(id, status)?;
                let job = db.get_job(id)?.ok_or(DeskError::JobNotFound { id })?;
                Ok((previous, job))
            })
            .await?;

        log::info!(
            "Job {} status {} -> {}",
            job.id,
            previous.status,
            job.status
        );
        let events = events::detect(&previous, &job, Zoned::now().date());
        log_events(&events);
        Ok(StatusChange { job, events })
    }

    /// Assigns a technician to a job, or unassigns when `tech_id` is absent.
    pub async fn assign_tech(&self, params: &AssignTech) -> Result<Job> {
        let id = params.id;
        let tech_id = params.tech_id;

        let job = self
            .with_db(move |db| {
                db.assign_tech(id, tech_id)?;
                db.get_job(id)?.ok_or(DeskError::JobNotFound { id })
            })
            .await?;

        match tech_id {
            Some(tech_id) => log::info!("Assigned technician {tech_id} to job {id}"),
            None => log::info!("Unassigned technician from job {id}"),
        }
        Ok(job)
    }

    /// Imports job records from another system, keeping their checklists
    /// exactly as given.
    pub async fn import_jobs(&self, jobs: Vec<Job>) -> Result<Vec<Job>> {
        let imported = self
            .with_db(move |db| {
                jobs.iter()
                    .map(|job| db.import_job(job))
                    .collect::<Result<Vec<_>>>()
            })
            .await?;
        log::info!("Imported {} jobs", imported.len());
        Ok(imported)
    }

    /// Imports job records from a JSON array, as written by
    /// [`import_jobs`](Self::import_jobs) callers exporting from another
    /// system.
    pub async fn import_jobs_json(&self, json: &str) -> Result<Vec<Job>> {
        let records: Vec<Job> = serde_json::from_str(json)?;
        log::debug!("Parsed {} job records for import", records.len());
        self.import_jobs(records).await
    }
}

pub(crate) fn log_events(events: &[JobEvent]) {
    for event in events {
        let recipients: Vec<&str> = event.recipients().iter().map(|r| r.as_str()).collect();
        log::info!(
            "{} for job {} -> {}: {}",
            event.title(),
            event.job_id(),
            recipients.join(", "),
            event
        );
    }
}
