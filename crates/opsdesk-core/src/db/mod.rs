//! SQLite storage for jobs, their checklists, technicians and clients.
//!
//! Every write that touches more than one row runs in a single transaction.
//! Queries are split by aggregate: [`job_queries`] for jobs and the
//! completion form, [`step_queries`] for checklist rows and
//! [`people_queries`] for technicians and clients.

use std::path::Path;

use rusqlite::{types::Type, Connection};

use crate::error::{DatabaseResultExt, Result};

pub mod job_queries;
pub mod migrations;
pub mod people_queries;
pub mod step_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens (or creates) the database at `path` and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Opens a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().db_context("Failed to open in-memory database")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}

/// Parses a TEXT column into any `FromStr` type, reporting failures as
/// conversion errors on that column.
pub(crate) fn parse_column<T>(idx: usize, value: &str) -> rusqlite::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("Invalid value '{value}': {e}").into(),
        )
    })
}

/// [`parse_column`] for nullable columns.
pub(crate) fn parse_optional_column<T>(
    idx: usize,
    value: Option<String>,
) -> rusqlite::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.map(|v| parse_column(idx, &v)).transpose()
}
