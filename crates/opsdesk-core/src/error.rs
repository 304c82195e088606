//! Errors returned by the desk and its storage layer.

use std::path::PathBuf;

use thiserror::Error;

/// Every failure a desk operation can report.
#[derive(Error, Debug)]
pub enum DeskError {
    /// SQLite failure, with what was being attempted
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// No job has this ID
    #[error("Job with ID {id} not found")]
    JobNotFound { id: u64 },
    /// No technician has this ID
    #[error("Technician with ID {id} not found")]
    TechnicianNotFound { id: u64 },
    /// No client has this ID
    #[error("Client with ID {id} not found")]
    ClientNotFound { id: u64 },
    /// Completion token did not resolve to a job. Deliberately carries no
    /// detail about the token or any job.
    #[error("Invalid or expired token")]
    TokenNotFound,
    /// The completion form for this job was already submitted
    #[error("Form already submitted")]
    FormAlreadySubmitted,
    /// Workflow type is not part of the catalog
    #[error("Unknown workflow type '{workflow_type}'")]
    UnknownWorkflowType { workflow_type: String },
    /// Could not create or reach the database location
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// No XDG data directory could be determined
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// A parameter failed validation
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Job records could not be parsed
    #[error("Invalid job records: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// The desk could not run the operation
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Pairs a database failure message with its rusqlite cause.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Attaches the rusqlite cause.
    pub fn with_source(self, source: rusqlite::Error) -> DeskError {
        DeskError::Database {
            message: self.message,
            source,
        }
    }
}

/// Names the offending field before the reason is known.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    pub fn with_reason(self, reason: impl Into<String>) -> DeskError {
        DeskError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl DeskError {
    /// Starts a [`DeskError::Database`].
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Starts a [`DeskError::InvalidInput`] for `field`.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Wraps a `spawn_blocking` join failure.
    pub(crate) fn join(error: tokio::task::JoinError) -> Self {
        Self::Configuration {
            message: format!("Task join error: {error}"),
        }
    }
}

/// Adds a message to rusqlite results.
pub trait DatabaseResultExt<T> {
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| DeskError::database(message).with_source(e))
    }
}

/// Result of a desk operation
pub type Result<T> = std::result::Result<T, DeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_error_does_not_leak_details() {
        assert_eq!(DeskError::TokenNotFound.to_string(), "Invalid or expired token");
    }

    #[test]
    fn invalid_input_builder_sets_field_and_reason() {
        let err = DeskError::invalid_input("index").with_reason("out of range");
        match err {
            DeskError::InvalidInput { field, reason } => {
                assert_eq!(field, "index");
                assert_eq!(reason, "out of range");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn db_context_wraps_rusqlite_error() {
        let result: std::result::Result<(), rusqlite::Error> =
            Err(rusqlite::Error::QueryReturnedNoRows);
        let err = result.db_context("Failed to load job").unwrap_err();
        assert!(err.to_string().contains("Failed to load job"));
    }
}
