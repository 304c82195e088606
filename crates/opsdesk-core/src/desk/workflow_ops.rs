//! Workflow catalog and checklist operations for the Desk.

use super::{commit_generated_steps, Desk};
use crate::{
    catalog::{self, WorkflowTemplate},
    display::Templates,
    error::{DeskError, Result},
    models::Job,
    params::{Id, SetWorkflow, ToggleStep, WorkflowLookup},
    progress,
};

impl Desk {
    /// All workflow templates in catalog order.
    pub fn list_templates(&self) -> Templates {
        Templates(catalog::list_templates())
    }

    /// Looks up one workflow template.
    pub fn get_template(&self, params: &WorkflowLookup) -> Result<&'static WorkflowTemplate> {
        catalog::get_template(&params.workflow_type).ok_or_else(|| {
            DeskError::UnknownWorkflowType {
                workflow_type: params.workflow_type.clone(),
            }
        })
    }

    /// Chooses a job's workflow and commits a fresh checklist for it.
    ///
    /// Existing progress is discarded, even when the type does not change.
    /// Clearing the workflow removes the checklist.
    pub async fn set_workflow_type(&self, params: &SetWorkflow) -> Result<Job> {
        params.validate()?;
        let id = params.id;
        let workflow_type = params.workflow_type.clone();

        let job = self
            .with_db(move |db| {
                let mut job = db.get_job(id)?.ok_or(DeskError::JobNotFound { id })?;
                let discarded = job.workflow_steps.iter().filter(|s| s.completed).count();
                progress::set_workflow_type(&mut job, workflow_type.as_deref());
                db.replace_workflow(id, job.workflow_type.as_deref(), &job.workflow_steps)?;
                if discarded > 0 {
                    log::warn!("Discarded {discarded} completed steps of job {id}");
                }
                db.get_job(id)?.ok_or(DeskError::JobNotFound { id })
            })
            .await?;

        log::info!(
            "Job {} workflow set to {}",
            job.id,
            job.workflow_type.as_deref().unwrap_or("none")
        );
        Ok(job)
    }

    /// Flips one checklist step.
    ///
    /// The step is addressed by its position in the job's checklist as
    /// displayed. For a job whose checklist was never saved, the displayed
    /// checklist is committed together with the toggle.
    pub async fn toggle_step(&self, params: &ToggleStep) -> Result<Job> {
        if params.completed_by.trim().is_empty() {
            return Err(DeskError::invalid_input("completed_by")
                .with_reason("An actor is required to toggle a step"));
        }
        let id = params.id;
        let index = params.index;
        let completed_by = params.completed_by.clone();

        let job = self
            .with_db(move |db| {
                let job = db.get_job(id)?.ok_or(DeskError::JobNotFound { id })?;
                let mut steps = progress::materialize(&job);
                if index >= steps.len() {
                    return Err(DeskError::invalid_input("index").with_reason(format!(
                        "Step index {index} is out of range; job {id} has {} steps",
                        steps.len()
                    )));
                }

                progress::toggle_step(&mut steps, index, &completed_by);
                db.save_steps(id, &steps)?;
                db.get_job(id)?.ok_or(DeskError::JobNotFound { id })
            })
            .await?;

        if let Some(step) = job.workflow_steps.get(params.index) {
            log::info!(
                "Job {} step '{}' marked {} by {}",
                job.id,
                step.step_name,
                if step.completed { "complete" } else { "incomplete" },
                params.completed_by
            );
        }
        Ok(job)
    }

    /// Saves the generated checklist of a job that has none yet.
    ///
    /// Jobs that already have a saved checklist, or no catalog workflow, are
    /// returned unchanged.
    pub async fn commit_workflow(&self, params: &Id) -> Result<Job> {
        let id = params.id;
        self.with_db(move |db| {
            let mut job = db.get_job(id)?.ok_or(DeskError::JobNotFound { id })?;
            if !commit_generated_steps(db, &mut job)? {
                log::debug!("Job {id} has nothing to commit");
            }
            Ok(job)
        })
        .await
    }

    /// Commits the generated checklist of every job that lacks one,
    /// regardless of the backfill policy. Returns the jobs that changed.
    pub async fn backfill_workflows(&self) -> Result<Vec<Job>> {
        let jobs = self
            .with_db(|db| {
                let mut jobs = db.jobs_needing_backfill()?;
                for job in &mut jobs {
                    commit_generated_steps(db, job)?;
                }
                Ok(jobs)
            })
            .await?;

        log::info!("Backfilled checklists for {} jobs", jobs.len());
        Ok(jobs)
    }
}
