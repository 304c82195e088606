//! Data models for jobs, technicians and clients.
//!
//! Display implementations for these models live in
//! [`crate::display::models`], keeping presentation apart from the data.
//! Workflow step progress is modelled in [`crate::progress`] because its
//! operations belong with it.
//!
//! # Examples
//!
//! ```rust
//! use opsdesk_core::models::{Job, JobStatus, JobSummary};
//! use jiff::Timestamp;
//!
//! let job = Job {
//!     id: 1,
//!     job_number: "J-1001".to_string(),
//!     model_name: "Riverside Warehouse".to_string(),
//!     workflow_type: Some("direct-scan-hosted".to_string()),
//!     // ... other fields
//! #   client_id: None,
//! #   tech: None,
//! #   status: JobStatus::Scheduled,
//! #   completion_status: None,
//! #   incompletion_reason: None,
//! #   incompletion_notes: None,
//! #   tech_feedback: None,
//! #   scanned_date: None,
//! #   target_date: None,
//! #   capture_address: None,
//! #   city: None,
//! #   state: None,
//! #   workflow_steps: vec![],
//! #   completion_token: None,
//! #   completion_form_submitted: false,
//! #   created_at: Timestamp::now(),
//! #   updated_at: Timestamp::now(),
//! };
//!
//! // Summaries show the checklist the template implies, even before it is saved.
//! let summary = JobSummary::from(&job);
//! assert_eq!(summary.progress.total, 7);
//! assert_eq!(summary.percentage(), 0);
//! ```

pub mod filters;
pub mod job;
pub mod people;
pub mod status;
pub mod summary;

pub use filters::JobFilter;
pub use job::{Job, TechRef};
pub use people::{Client, Technician};
pub use status::{CompletionStatus, IncompletionReason, JobStatus};
pub use summary::JobSummary;
