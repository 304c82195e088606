//! Database schema initialization and migrations.

use crate::error::{DatabaseResultExt, Result};

/// Columns added after the first release, with their definitions.
const ADDED_COLUMNS: &[(&str, &str, &str)] = &[
    (
        "job_workflow_steps",
        "kind",
        "TEXT CHECK (kind IN ('scan-completed', 'upload', 'other'))",
    ),
    ("clients", "default_workflow", "TEXT"),
];

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        self.apply_migrations()
    }

    /// Adds columns missing from databases created by older releases.
    ///
    /// Steps saved before kinds existed keep a NULL kind and are classified by
    /// name when read.
    fn apply_migrations(&self) -> Result<()> {
        for (table, column, definition) in ADDED_COLUMNS {
            if !self.has_column(table, column)? {
                log::info!("Migrating: adding {table}.{column}");
                self.connection
                    .execute(&format!("ALTER TABLE {table} ADD COLUMN {column} {definition}"), [])
                    .db_context(&format!("Failed to add {column} column to {table} table"))?;
            }
        }
        Ok(())
    }

    fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        self.connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
                [table, column],
                |row| row.get::<_, i64>(0),
            )
            .map(|count| count > 0)
            .db_context("Failed to inspect table columns")
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::super::Database;

    #[test]
    fn test_migrates_legacy_step_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.db");

        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE clients (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, created_at TEXT NOT NULL);
                 CREATE TABLE job_workflow_steps (
                     job_id INTEGER NOT NULL,
                     step_order INTEGER NOT NULL,
                     step_name TEXT NOT NULL,
                     completed INTEGER NOT NULL DEFAULT 0,
                     completed_at TEXT,
                     completed_by TEXT,
                     notes TEXT NOT NULL DEFAULT '',
                     PRIMARY KEY (job_id, step_order)
                 );",
            )
            .unwrap();
        }

        let db = Database::new(&path).unwrap();
        assert!(db.has_column("job_workflow_steps", "kind").unwrap());
        assert!(db.has_column("clients", "default_workflow").unwrap());

        // Opening again is a no-op.
        drop(db);
        assert!(Database::new(&path).is_ok());
    }

    #[test]
    fn test_schema_has_tables_only() {
        let db = Database::in_memory().unwrap();
        let views: i64 = db
            .connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'view'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(views, 0);
    }
}
