use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use opsdesk_core::BackfillPolicy;

use crate::cli::{ClientCommands, FormCommands, JobCommands, TechCommands, WorkflowCommands};

/// Command-line interface for the Opsdesk scanning-operations desk
///
/// Opsdesk tracks scanning jobs through checklists built from a fixed catalog
/// of workflow templates. Technicians report captures through a
/// token-protected completion form, and the desk ticks off the scan and
/// upload steps for them. The same operations are available to AI
/// assistants through the MCP server started with `serve`.
#[derive(Parser)]
#[command(version, about, name = "opsdesk")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/opsdesk/opsdesk.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// When jobs without a saved checklist get their template checklist
    /// written: only on explicit commands (lazy) or on first read (eager)
    #[arg(long, global = true, value_enum)]
    pub backfill: Option<BackfillArg>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Opsdesk CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Browse the workflow template catalog
    #[command(alias = "w")]
    Workflow {
        #[command(subcommand)]
        command: WorkflowCommands,
    },
    /// Manage scanning jobs and their checklists
    #[command(alias = "j")]
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Manage field technicians
    #[command(alias = "t")]
    Tech {
        #[command(subcommand)]
        command: TechCommands,
    },
    /// Manage clients
    #[command(alias = "c")]
    Client {
        #[command(subcommand)]
        command: ClientCommands,
    },
    /// Open or submit a technician completion form
    #[command(alias = "f")]
    Form {
        #[command(subcommand)]
        command: FormCommands,
    },
    /// Start the MCP server
    Serve,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum BackfillArg {
    /// Write template checklists only through `job backfill` or a toggle
    Lazy,
    /// Write template checklists the first time a job is read
    Eager,
}

impl From<BackfillArg> for BackfillPolicy {
    fn from(val: BackfillArg) -> Self {
        match val {
            BackfillArg::Lazy => BackfillPolicy::Lazy,
            BackfillArg::Eager => BackfillPolicy::Eager,
        }
    }
}
