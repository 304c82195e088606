//! High-level desk API for jobs, workflows and the completion form.
//!
//! [`Desk`] is the single entry point used by the CLI and the MCP server. It
//! validates parameters, runs the pure workflow logic from
//! [`crate::progress`], [`crate::automation`] and [`crate::events`], and
//! persists the result through [`crate::db::Database`].
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Desk ops      │    │  Pure logic     │    │    Database     │
//! │ (job_ops, form_ │───▶│ (progress,      │───▶│   (via db/)     │
//! │  ops, ...)      │    │  automation)    │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Every operation opens its own connection on a blocking thread, so a
//! [`Desk`] is cheap to clone and share.
//!
//! # Examples
//!
//! ```rust,no_run
//! use opsdesk_core::{params::{CreateJob, ToggleStep}, DeskBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let desk = DeskBuilder::new()
//!     .with_database_path("/tmp/opsdesk.db")
//!     .build()
//!     .await?;
//!
//! let job = desk
//!     .create_job(&CreateJob {
//!         job_number: "J-1001".to_string(),
//!         model_name: "Riverside Warehouse".to_string(),
//!         workflow_type: Some("direct-scan-hosted".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let job = desk
//!     .toggle_step(&ToggleStep {
//!         id: job.id,
//!         index: 0,
//!         completed_by: "ops@example.com".to_string(),
//!     })
//!     .await?;
//! assert!(job.workflow_steps[0].completed);
//! # Ok(())
//! # }
//! ```

use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};
use tokio::task;

use crate::{
    db::Database,
    error::{DeskError, Result},
    models::Job,
    progress,
};

pub mod builder;
pub mod form_ops;
pub mod job_ops;
pub mod people_ops;
pub mod workflow_ops;

#[cfg(test)]
mod tests;

pub use builder::DeskBuilder;
pub use form_ops::{CompletionFormView, FormSubmission};
pub use job_ops::StatusChange;

/// What to do with jobs that name a workflow but have no saved checklist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackfillPolicy {
    /// Show a generated checklist but never write it on read
    #[default]
    Lazy,
    /// Commit the generated checklist the first time the job is read
    Eager,
}

impl BackfillPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackfillPolicy::Lazy => "lazy",
            BackfillPolicy::Eager => "eager",
        }
    }
}

impl FromStr for BackfillPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "lazy" => Ok(BackfillPolicy::Lazy),
            "eager" => Ok(BackfillPolicy::Eager),
            _ => Err(format!("Invalid backfill policy: {s} (expected lazy or eager)")),
        }
    }
}

impl fmt::Display for BackfillPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main desk interface.
#[derive(Debug, Clone)]
pub struct Desk {
    pub(crate) db_path: PathBuf,
    pub(crate) backfill: BackfillPolicy,
}

impl Desk {
    pub(crate) fn new(db_path: PathBuf, backfill: BackfillPolicy) -> Self {
        Self { db_path, backfill }
    }

    /// Path of the SQLite database backing this desk.
    pub fn database_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// The configured backfill policy.
    pub fn backfill_policy(&self) -> BackfillPolicy {
        self.backfill
    }

    /// Runs `op` against a fresh connection on the blocking thread pool.
    pub(crate) async fn with_db<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            op(&mut db)
        })
        .await
        .map_err(DeskError::join)?
    }
}

/// Commits the generated checklist of a job that has none yet. Returns
/// whether anything was written.
pub(crate) fn commit_generated_steps(db: &mut Database, job: &mut Job) -> Result<bool> {
    if !job.needs_backfill() {
        return Ok(false);
    }

    let steps = progress::materialize(job);
    db.save_steps(job.id, &steps)?;
    log::info!(
        "Committed {} generated steps for job {} ({})",
        steps.len(),
        job.id,
        job.workflow_type.as_deref().unwrap_or_default()
    );
    job.workflow_steps = steps;
    Ok(true)
}

/// Loads a job for reading, applying the backfill policy.
pub(crate) fn load_job(db: &mut Database, id: u64, policy: BackfillPolicy) -> Result<Job> {
    let mut job = db.get_job(id)?.ok_or(DeskError::JobNotFound { id })?;
    if policy == BackfillPolicy::Eager {
        commit_generated_steps(db, &mut job)?;
    }
    Ok(job)
}
