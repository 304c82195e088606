//! Checklist rows for jobs.
//!
//! A job's checklist is stored as one row per step keyed by
//! `(job_id, step_order)`. Writes always replace the whole checklist, which
//! keeps `step_order` dense and matching the in-memory index.

use jiff::Timestamp;
use rusqlite::{params, Connection};

use super::{parse_column, parse_optional_column};
use crate::{
    catalog::StepKind,
    error::{DatabaseResultExt, DeskError, Result},
    progress::WorkflowStepProgress,
};

const SELECT_STEPS_BY_JOB_SQL: &str = "SELECT step_name, kind, completed, completed_at, completed_by, notes FROM job_workflow_steps WHERE job_id = ?1 ORDER BY step_order";
const DELETE_STEPS_BY_JOB_SQL: &str = "DELETE FROM job_workflow_steps WHERE job_id = ?1";
const INSERT_STEP_SQL: &str = "INSERT INTO job_workflow_steps (job_id, step_order, step_name, kind, completed, completed_at, completed_by, notes) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const UPDATE_JOB_WORKFLOW_SQL: &str =
    "UPDATE jobs SET workflow_type = ?1, updated_at = ?2 WHERE id = ?3";
const TOUCH_JOB_SQL: &str = "UPDATE jobs SET updated_at = ?1 WHERE id = ?2";

fn build_step_from_row(row: &rusqlite::Row) -> rusqlite::Result<WorkflowStepProgress> {
    let completed_at = row
        .get::<_, Option<String>>(3)?
        .map(|s| parse_column::<Timestamp>(3, &s))
        .transpose()?;

    Ok(WorkflowStepProgress {
        step_name: row.get(0)?,
        kind: parse_optional_column::<StepKind>(1, row.get(1)?)?,
        completed: row.get(2)?,
        completed_at,
        completed_by: row.get(4)?,
        notes: row.get(5)?,
    })
}

/// Loads the persisted checklist of a job, in order.
pub(super) fn load_steps(conn: &Connection, job_id: u64) -> Result<Vec<WorkflowStepProgress>> {
    let mut stmt = conn
        .prepare(SELECT_STEPS_BY_JOB_SQL)
        .db_context("Failed to prepare steps query")?;

    let steps = stmt
        .query_map(params![job_id as i64], build_step_from_row)
        .db_context("Failed to query steps")?
        .collect::<std::result::Result<Vec<_>, _>>()
        .db_context("Failed to fetch steps")?;

    Ok(steps)
}

/// Replaces the stored checklist of a job with `steps`.
pub(super) fn write_steps(
    conn: &Connection,
    job_id: u64,
    steps: &[WorkflowStepProgress],
) -> Result<()> {
    conn.execute(DELETE_STEPS_BY_JOB_SQL, params![job_id as i64])
        .db_context("Failed to delete steps")?;

    let mut stmt = conn
        .prepare(INSERT_STEP_SQL)
        .db_context("Failed to prepare step insert")?;

    for (order, step) in steps.iter().enumerate() {
        stmt.execute(params![
            job_id as i64,
            order as i64,
            step.step_name,
            step.kind.map(|k| k.as_str()),
            step.completed,
            step.completed_at.map(|t| t.to_string()),
            step.completed_by,
            step.notes,
        ])
        .db_context("Failed to insert step")?;
    }

    Ok(())
}

impl super::Database {
    /// Returns the persisted checklist of a job. Empty when nothing has been
    /// committed yet.
    pub fn get_steps(&self, job_id: u64) -> Result<Vec<WorkflowStepProgress>> {
        load_steps(&self.connection, job_id)
    }

    /// Sets the workflow type of a job and replaces its checklist, in one
    /// transaction.
    pub fn replace_workflow(
        &mut self,
        job_id: u64,
        workflow_type: Option<&str>,
        steps: &[WorkflowStepProgress],
    ) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now_str = Timestamp::now().to_string();
        let changed = tx
            .execute(
                UPDATE_JOB_WORKFLOW_SQL,
                params![workflow_type, &now_str, job_id as i64],
            )
            .db_context("Failed to update workflow type")?;

        if changed == 0 {
            return Err(DeskError::JobNotFound { id: job_id });
        }

        write_steps(&tx, job_id, steps)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }

    /// Replaces the checklist of a job, keeping its workflow type.
    pub fn save_steps(&mut self, job_id: u64, steps: &[WorkflowStepProgress]) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now_str = Timestamp::now().to_string();
        let changed = tx
            .execute(TOUCH_JOB_SQL, params![&now_str, job_id as i64])
            .db_context("Failed to update job timestamp")?;

        if changed == 0 {
            return Err(DeskError::JobNotFound { id: job_id });
        }

        write_steps(&tx, job_id, steps)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }
}
