//! Job CRUD operations, completion-form writes and backfill queries.

use jiff::{civil::Date, Timestamp};
use rand::Rng;
use rusqlite::{params, Connection, OptionalExtension};

use super::{
    parse_column, parse_optional_column,
    step_queries::{load_steps, write_steps},
};
use crate::{
    error::{DatabaseResultExt, DeskError, Result},
    models::{Job, JobFilter, JobStatus, TechRef, Technician},
    progress,
};

const JOB_COLUMNS: &str = "j.id, j.job_number, j.model_name, j.client_id, j.tech_id, t.name, t.email, j.status, j.completion_status, j.incompletion_reason, j.incompletion_notes, j.tech_feedback, j.scanned_date, j.target_date, j.capture_address, j.city, j.state, j.workflow_type, j.completion_token, j.completion_form_submitted, j.created_at, j.updated_at";
const JOB_FROM: &str = "jobs j LEFT JOIN technicians t ON t.id = j.tech_id";

const INSERT_JOB_SQL: &str = "INSERT INTO jobs (job_number, model_name, client_id, tech_id, status, completion_status, incompletion_reason, incompletion_notes, tech_feedback, scanned_date, target_date, capture_address, city, state, workflow_type, completion_token, completion_form_submitted, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)";
const CHECK_JOB_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM jobs WHERE id = ?1)";
const CHECK_CLIENT_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM clients WHERE id = ?1)";
const CHECK_TECHNICIAN_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM technicians WHERE id = ?1)";
const SELECT_CLIENT_DEFAULT_WORKFLOW_SQL: &str =
    "SELECT default_workflow FROM clients WHERE id = ?1";
const UPDATE_JOB_STATUS_SQL: &str = "UPDATE jobs SET status = ?1, updated_at = ?2 WHERE id = ?3";
const UPDATE_JOB_TECH_SQL: &str = "UPDATE jobs SET tech_id = ?1, updated_at = ?2 WHERE id = ?3";
const UPDATE_JOB_COMPLETION_SQL: &str = "UPDATE jobs SET status = ?1, completion_status = ?2, incompletion_reason = ?3, incompletion_notes = ?4, tech_feedback = ?5, scanned_date = ?6, completion_form_submitted = 1, updated_at = ?7 WHERE id = ?8 AND completion_form_submitted = 0";
const BACKFILL_CANDIDATES_WHERE: &str = "j.workflow_type IS NOT NULL AND NOT EXISTS (SELECT 1 FROM job_workflow_steps s WHERE s.job_id = j.id)";

/// Fields accepted when creating a job.
#[derive(Debug, Clone, Default)]
pub struct NewJob<'a> {
    pub job_number: &'a str,
    pub model_name: &'a str,
    pub client_id: Option<u64>,
    pub workflow_type: Option<&'a str>,
    pub target_date: Option<Date>,
    pub capture_address: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
}

/// A fresh completion-form token: 32 random bytes, hex encoded.
pub(crate) fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn build_job_from_row(row: &rusqlite::Row) -> rusqlite::Result<Job> {
    let tech_id: Option<i64> = row.get(4)?;
    let tech_name: Option<String> = row.get(5)?;
    let tech_email: Option<String> = row.get(6)?;
    let tech = match (tech_id, tech_name, tech_email) {
        (Some(id), Some(name), Some(email)) => Some(TechRef::Expanded(Technician {
            id: id as u64,
            name,
            email,
        })),
        (Some(id), _, _) => Some(TechRef::Id(id as u64)),
        _ => None,
    };

    Ok(Job {
        id: row.get::<_, i64>(0)? as u64,
        job_number: row.get(1)?,
        model_name: row.get(2)?,
        client_id: row.get::<_, Option<i64>>(3)?.map(|id| id as u64),
        tech,
        status: parse_column(7, &row.get::<_, String>(7)?)?,
        completion_status: parse_optional_column(8, row.get(8)?)?,
        incompletion_reason: parse_optional_column(9, row.get(9)?)?,
        incompletion_notes: row.get(10)?,
        tech_feedback: row.get(11)?,
        scanned_date: parse_optional_column(12, row.get(12)?)?,
        target_date: parse_optional_column(13, row.get(13)?)?,
        capture_address: row.get(14)?,
        city: row.get(15)?,
        state: row.get(16)?,
        workflow_type: row.get(17)?,
        completion_token: row.get(18)?,
        completion_form_submitted: row.get(19)?,
        created_at: parse_column(20, &row.get::<_, String>(20)?)?,
        updated_at: parse_column(21, &row.get::<_, String>(21)?)?,
        workflow_steps: Vec::new(),
    })
}

fn ensure_exists(conn: &Connection, sql: &str, id: u64, missing: DeskError) -> Result<()> {
    let exists: bool = conn
        .query_row(sql, params![id as i64], |row| row.get(0))
        .db_context("Failed to check record existence")?;
    if exists {
        Ok(())
    } else {
        Err(missing)
    }
}

impl super::Database {
    /// Creates a job with a fresh completion token.
    ///
    /// Without an explicit workflow type the client's default workflow is
    /// used. When the resulting type is in the catalog its checklist is
    /// committed together with the job.
    pub fn create_job(&mut self, new: &NewJob<'_>) -> Result<Job> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let mut workflow_type = new.workflow_type.map(String::from);
        if let Some(client_id) = new.client_id {
            ensure_exists(
                &tx,
                CHECK_CLIENT_EXISTS_SQL,
                client_id,
                DeskError::ClientNotFound { id: client_id },
            )?;
            if workflow_type.is_none() {
                workflow_type = tx
                    .query_row(
                        SELECT_CLIENT_DEFAULT_WORKFLOW_SQL,
                        params![client_id as i64],
                        |row| row.get(0),
                    )
                    .db_context("Failed to read client default workflow")?;
            }
        }

        let now_str = Timestamp::now().to_string();
        tx.execute(
            INSERT_JOB_SQL,
            params![
                new.job_number,
                new.model_name,
                new.client_id.map(|id| id as i64),
                None::<i64>,
                JobStatus::default().as_str(),
                None::<String>,
                None::<String>,
                None::<String>,
                None::<String>,
                None::<String>,
                new.target_date.map(|d| d.to_string()),
                new.capture_address,
                new.city,
                new.state,
                workflow_type.as_deref(),
                generate_token(),
                false,
                &now_str,
                &now_str,
            ],
        )
        .db_context("Failed to insert job")?;

        let id = tx.last_insert_rowid() as u64;

        if let Some(workflow_type) = workflow_type.as_deref() {
            write_steps(&tx, id, &progress::generate_steps(workflow_type))?;
        }

        tx.commit().db_context("Failed to commit transaction")?;

        self.get_job(id)?.ok_or(DeskError::JobNotFound { id })
    }

    /// Inserts an existing job record as-is, under a new ID.
    ///
    /// Used to bring in jobs from older systems: the checklist is stored
    /// exactly as given (possibly empty) and a token is generated only when
    /// the record has none.
    pub fn import_job(&mut self, job: &Job) -> Result<Job> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        if let Some(client_id) = job.client_id {
            ensure_exists(
                &tx,
                CHECK_CLIENT_EXISTS_SQL,
                client_id,
                DeskError::ClientNotFound { id: client_id },
            )?;
        }
        let tech_id = job.tech.as_ref().map(TechRef::id);
        if let Some(tech_id) = tech_id {
            ensure_exists(
                &tx,
                CHECK_TECHNICIAN_EXISTS_SQL,
                tech_id,
                DeskError::TechnicianNotFound { id: tech_id },
            )?;
        }

        let token = job.completion_token.clone().unwrap_or_else(generate_token);
        tx.execute(
            INSERT_JOB_SQL,
            params![
                job.job_number,
                job.model_name,
                job.client_id.map(|id| id as i64),
                tech_id.map(|id| id as i64),
                job.status.as_str(),
                job.completion_status.map(|s| s.as_str()),
                job.incompletion_reason.map(|r| r.as_str()),
                job.incompletion_notes,
                job.tech_feedback,
                job.scanned_date.map(|d| d.to_string()),
                job.target_date.map(|d| d.to_string()),
                job.capture_address,
                job.city,
                job.state,
                job.workflow_type,
                token,
                job.completion_form_submitted,
                job.created_at.to_string(),
                job.updated_at.to_string(),
            ],
        )
        .db_context("Failed to insert job")?;

        let id = tx.last_insert_rowid() as u64;
        write_steps(&tx, id, &job.workflow_steps)?;

        tx.commit().db_context("Failed to commit transaction")?;

        self.get_job(id)?.ok_or(DeskError::JobNotFound { id })
    }

    /// Retrieves a job by ID with its technician expanded and its persisted
    /// checklist loaded.
    pub fn get_job(&self, id: u64) -> Result<Option<Job>> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM {JOB_FROM} WHERE j.id = ?1");
        self.query_one_job(&sql, params![id as i64])
    }

    /// Resolves a completion-form token to its job.
    pub fn find_job_by_token(&self, token: &str) -> Result<Option<Job>> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM {JOB_FROM} WHERE j.completion_token = ?1");
        self.query_one_job(&sql, params![token])
    }

    fn query_one_job(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Option<Job>> {
        let job = self
            .connection
            .query_row(sql, params, build_job_from_row)
            .optional()
            .db_context("Failed to query job")?;

        let Some(mut job) = job else {
            return Ok(None);
        };
        job.workflow_steps = load_steps(&self.connection, job.id)?;
        Ok(Some(job))
    }

    /// Lists jobs matching `filter`, newest first.
    ///
    /// Archived jobs are left out unless the filter asks for them, either by
    /// status or with `include_archived`.
    pub fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        let mut query = format!("SELECT {JOB_COLUMNS} FROM {JOB_FROM}");

        let mut conditions = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(status) = filter.status {
            conditions.push("j.status = ?");
            params_vec.push(Box::new(status.as_str()));
        } else if !filter.include_archived {
            conditions.push("j.status != ?");
            params_vec.push(Box::new(JobStatus::Archived.as_str()));
        }

        if let Some(ref workflow_type) = filter.workflow_type {
            conditions.push("j.workflow_type = ?");
            params_vec.push(Box::new(workflow_type.clone()));
        }

        if let Some(tech_id) = filter.tech_id {
            conditions.push("j.tech_id = ?");
            params_vec.push(Box::new(tech_id as i64));
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY julianday(j.created_at) DESC, j.id DESC");

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();
        self.query_jobs(&query, &params_refs)
    }

    /// Jobs that name a catalog workflow but have no committed checklist.
    pub fn jobs_needing_backfill(&self) -> Result<Vec<Job>> {
        let query =
            format!("SELECT {JOB_COLUMNS} FROM {JOB_FROM} WHERE {BACKFILL_CANDIDATES_WHERE} ORDER BY j.id");
        let mut jobs = self.query_jobs(&query, &[])?;
        jobs.retain(Job::needs_backfill);
        Ok(jobs)
    }

    fn query_jobs(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<Job>> {
        let mut stmt = self
            .connection
            .prepare(sql)
            .db_context("Failed to prepare query")?;

        let mut jobs = stmt
            .query_map(params, build_job_from_row)
            .db_context("Failed to query jobs")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch jobs")?;

        for job in &mut jobs {
            job.workflow_steps = load_steps(&self.connection, job.id)?;
        }

        Ok(jobs)
    }

    /// Sets the lifecycle status of a job.
    pub fn update_job_status(&mut self, id: u64, status: JobStatus) -> Result<()> {
        let changed = self
            .connection
            .execute(
                UPDATE_JOB_STATUS_SQL,
                params![status.as_str(), Timestamp::now().to_string(), id as i64],
            )
            .db_context("Failed to update job status")?;

        if changed == 0 {
            return Err(DeskError::JobNotFound { id });
        }
        Ok(())
    }

    /// Assigns a technician to a job, or unassigns with `None`.
    pub fn assign_tech(&mut self, id: u64, tech_id: Option<u64>) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        if let Some(tech_id) = tech_id {
            ensure_exists(
                &tx,
                CHECK_TECHNICIAN_EXISTS_SQL,
                tech_id,
                DeskError::TechnicianNotFound { id: tech_id },
            )?;
        }

        let changed = tx
            .execute(
                UPDATE_JOB_TECH_SQL,
                params![
                    tech_id.map(|t| t as i64),
                    Timestamp::now().to_string(),
                    id as i64
                ],
            )
            .db_context("Failed to assign technician")?;

        if changed == 0 {
            return Err(DeskError::JobNotFound { id });
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }

    /// Persists a completion-form submission: the job's completion fields,
    /// its status, the submitted flag and its whole checklist, in one
    /// transaction.
    ///
    /// The write only applies while the form is still unsubmitted, so two
    /// racing submissions cannot both succeed.
    pub fn apply_completion(&mut self, job: &Job) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let changed = tx
            .execute(
                UPDATE_JOB_COMPLETION_SQL,
                params![
                    job.status.as_str(),
                    job.completion_status.map(|s| s.as_str()),
                    job.incompletion_reason.map(|r| r.as_str()),
                    job.incompletion_notes,
                    job.tech_feedback,
                    job.scanned_date.map(|d| d.to_string()),
                    job.updated_at.to_string(),
                    job.id as i64,
                ],
            )
            .db_context("Failed to record completion")?;

        if changed == 0 {
            let exists: bool = tx
                .query_row(CHECK_JOB_EXISTS_SQL, params![job.id as i64], |row| row.get(0))
                .db_context("Failed to check job existence")?;
            return Err(if exists {
                DeskError::FormAlreadySubmitted
            } else {
                DeskError::JobNotFound { id: job.id }
            });
        }

        write_steps(&tx, job.id, &job.workflow_steps)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_is_64_hex_chars() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token());
    }
}
