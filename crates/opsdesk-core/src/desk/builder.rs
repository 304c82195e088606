//! Builder for creating and configuring Desk instances.

use std::path::{Path, PathBuf};

use tokio::task;

use super::{BackfillPolicy, Desk};
use crate::{
    db::Database,
    error::{DeskError, Result},
};

/// Builder for creating and configuring Desk instances.
#[derive(Debug, Clone, Default)]
pub struct DeskBuilder {
    database_path: Option<PathBuf>,
    backfill: BackfillPolicy,
}

impl DeskBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/opsdesk/opsdesk.db` or `~/.local/share/opsdesk/opsdesk.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets how jobs without a saved checklist are treated on read.
    pub fn with_backfill_policy(mut self, policy: BackfillPolicy) -> Self {
        self.backfill = policy;
        self
    }

    /// Builds the configured desk, creating the database if needed.
    ///
    /// # Errors
    ///
    /// Returns `DeskError::FileSystem` if the database directory cannot be
    /// created and `DeskError::Database` if schema initialization fails.
    pub async fn build(self) -> Result<Desk> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| DeskError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || Database::new(&db_path_clone).map(drop))
            .await
            .map_err(DeskError::join)??;

        log::debug!(
            "Desk ready at {} (backfill: {})",
            db_path.display(),
            self.backfill
        );
        Ok(Desk::new(db_path, self.backfill))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("opsdesk")
            .place_data_file("opsdesk.db")
            .map_err(|e| DeskError::XdgDirectory(e.to_string()))
    }
}
