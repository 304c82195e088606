//! Markdown presentation of jobs, templates and operation results.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! collections and operation outcomes get newtype wrappers so each context
//! can choose its own framing. All output is markdown, rendered by the CLI's
//! terminal renderer and returned verbatim by the MCP server.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │    Wrappers     │    │    Markdown     │
//! │  (Job, Step)    │───▶│ (Jobs, Create-  │───▶│  (Terminal/MCP) │
//! │                 │    │  Result, ...)   │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: Collection wrappers (Jobs, Templates, Technicians, Clients)
//! - [`results`]: Operation results (CreateResult, UpdateResult, submissions)
//! - [`status`]: Confirmation messages and notification lists
//! - [`datetime`]: Date/time formatting
//! - [`models`]: Display implementations for domain models
//!
//! # Examples
//!
//! ```rust
//! use opsdesk_core::display::{OperationStatus, Templates};
//!
//! let templates = Templates(opsdesk_core::catalog::list_templates());
//! let output = templates.to_string();
//! assert!(output.contains("Direct: Scan Hosted by Us"));
//!
//! let status = OperationStatus::success("Backfilled 3 jobs".to_string());
//! assert!(status.to_string().starts_with("Success:"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Clients, Jobs, Technicians, Templates};
pub use datetime::LocalDateTime;
pub use results::{CreateResult, UpdateResult};
pub use status::{Notifications, OperationStatus};
