//! Core library for the Opsdesk scanning-operations desk.
//!
//! Opsdesk tracks scanning jobs through a per-job checklist instantiated from
//! a fixed catalog of workflow templates, and lets field technicians report
//! completion through a token-protected form that ticks off the relevant
//! checklist steps on their behalf.
//!
//! # Layers
//!
//! - [`catalog`]: the static workflow templates
//! - [`progress`]: pure checklist logic (materialise, toggle, percentage)
//! - [`automation`]: the completion-form rule over step kinds
//! - [`events`]: notifications derived from job transitions
//! - [`db`]: SQLite persistence
//! - [`desk`]: the async service used by every interface
//! - [`display`]: markdown presentation
//!
//! # Quick Start
//!
//! ```rust
//! use opsdesk_core::{params::{CreateJob, ListJobs}, DeskBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let desk = DeskBuilder::new()
//!     .with_database_path("test.db")
//!     .build()
//!     .await?;
//!
//! let job = desk
//!     .create_job(&CreateJob {
//!         job_number: "J-1001".to_string(),
//!         model_name: "Riverside Warehouse".to_string(),
//!         workflow_type: Some("outsourced-scan-upload-client".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("{job}");
//!
//! let jobs = desk.list_job_summaries(&ListJobs::default()).await?;
//! for summary in &jobs {
//!     println!("{}: {}%", summary.job_number, summary.percentage());
//! }
//! # Ok(())
//! # }
//! ```

pub mod automation;
pub mod catalog;
pub mod db;
pub mod desk;
pub mod display;
pub mod error;
pub mod events;
pub mod models;
pub mod params;
pub mod progress;

pub use catalog::{Role, StepKind, WorkflowStepTemplate, WorkflowTemplate};
pub use db::Database;
pub use desk::{BackfillPolicy, CompletionFormView, Desk, DeskBuilder, FormSubmission, StatusChange};
pub use display::{CreateResult, Jobs, OperationStatus, Templates, UpdateResult};
pub use error::{DeskError, Result};
pub use events::JobEvent;
pub use models::{
    Client, CompletionStatus, IncompletionReason, Job, JobFilter, JobStatus, JobSummary, TechRef,
    Technician,
};
pub use progress::{ProgressCounts, WorkflowStepProgress};
