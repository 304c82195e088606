//! Command definitions and their handlers.
//!
//! Each subcommand has a clap argument struct that converts into the core
//! parameter type, so the core stays free of clap:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Desk
//! ```
//!
//! [`Cli`] runs a command against the [`Desk`] and renders the markdown the
//! core's display wrappers produce.

use std::{fmt, fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use opsdesk_core::{
    display::{Clients, CreateResult, OperationStatus, Technicians, UpdateResult},
    params::*,
    Desk, Job,
};

use crate::renderer::TerminalRenderer;

/// Show one workflow template
#[derive(Args)]
pub struct ShowWorkflowArgs {
    #[arg(help = "Catalog key of the template, e.g. direct-scan-hosted")]
    pub workflow_type: String,
}

impl From<ShowWorkflowArgs> for WorkflowLookup {
    fn from(val: ShowWorkflowArgs) -> Self {
        WorkflowLookup {
            workflow_type: val.workflow_type,
        }
    }
}

#[derive(Subcommand)]
pub enum WorkflowCommands {
    /// List the workflow templates
    #[command(aliases = ["l", "ls"])]
    List,
    /// Show the steps of a workflow template
    #[command(alias = "s")]
    Show(ShowWorkflowArgs),
}

/// Create a new job
///
/// The job gets a completion-form token for the technician. When a workflow
/// is chosen (directly or through the client's default) its checklist is
/// saved with the job.
#[derive(Args)]
pub struct CreateJobArgs {
    /// Business-facing job number
    pub job_number: String,
    /// Name of the model or property to capture
    pub model_name: String,
    #[arg(long, help = "ID of the ordering client")]
    pub client: Option<u64>,
    #[arg(
        short,
        long,
        help = "Workflow template key; defaults to the client's default workflow"
    )]
    pub workflow: Option<String>,
    #[arg(long, help = "Scheduled capture date (YYYY-MM-DD)")]
    pub target_date: Option<String>,
    #[arg(long, help = "Street address of the site")]
    pub address: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
}

impl From<CreateJobArgs> for CreateJob {
    fn from(val: CreateJobArgs) -> Self {
        CreateJob {
            job_number: val.job_number,
            model_name: val.model_name,
            client_id: val.client,
            workflow_type: val.workflow,
            target_date: val.target_date,
            capture_address: val.address,
            city: val.city,
            state: val.state,
        }
    }
}

/// List jobs, newest first
///
/// Archived jobs are hidden unless asked for with --status archived or
/// --all.
#[derive(Args)]
pub struct ListJobsArgs {
    #[arg(
        short,
        long,
        help = "Only jobs in this status (request, scheduled, scanned, qc, done, archived)"
    )]
    pub status: Option<String>,
    #[arg(short, long, help = "Only jobs using this workflow template")]
    pub workflow: Option<String>,
    #[arg(long, help = "Only jobs assigned to this technician ID")]
    pub tech: Option<u64>,
    #[arg(long, help = "Include archived jobs")]
    pub all: bool,
}

impl From<ListJobsArgs> for ListJobs {
    fn from(val: ListJobsArgs) -> Self {
        ListJobs {
            status: val.status,
            workflow_type: val.workflow,
            tech_id: val.tech,
            include_archived: val.all,
        }
    }
}

#[derive(Args)]
pub struct JobIdArgs {
    #[arg(help = "Unique identifier of the job")]
    pub id: u64,
}

impl From<JobIdArgs> for Id {
    fn from(val: JobIdArgs) -> Self {
        Id { id: val.id }
    }
}

/// Move a job to a new lifecycle status
#[derive(Args)]
pub struct UpdateStatusArgs {
    #[arg(help = "Unique identifier of the job")]
    pub id: u64,
    #[arg(help = "New status (request, scheduled, scanned, qc, done, archived)")]
    pub status: String,
}

impl From<UpdateStatusArgs> for UpdateStatus {
    fn from(val: UpdateStatusArgs) -> Self {
        UpdateStatus {
            id: val.id,
            status: val.status,
        }
    }
}

/// Assign a technician, or unassign when no technician ID is given
#[derive(Args)]
pub struct AssignTechArgs {
    #[arg(help = "Unique identifier of the job")]
    pub id: u64,
    #[arg(help = "Technician ID; omit to unassign")]
    pub tech_id: Option<u64>,
}

impl From<AssignTechArgs> for AssignTech {
    fn from(val: AssignTechArgs) -> Self {
        AssignTech {
            id: val.id,
            tech_id: val.tech_id,
        }
    }
}

/// Change the workflow of a job
///
/// The checklist is replaced by the new template's steps and any recorded
/// progress is discarded. Omitting the type clears the workflow.
#[derive(Args)]
pub struct SetWorkflowArgs {
    #[arg(help = "Unique identifier of the job")]
    pub id: u64,
    #[arg(help = "Workflow template key; omit to clear the workflow")]
    pub workflow_type: Option<String>,
}

impl From<SetWorkflowArgs> for SetWorkflow {
    fn from(val: SetWorkflowArgs) -> Self {
        SetWorkflow {
            id: val.id,
            workflow_type: val.workflow_type,
        }
    }
}

/// Flip the completion state of one checklist step
#[derive(Args)]
pub struct ToggleStepArgs {
    #[arg(help = "Unique identifier of the job")]
    pub id: u64,
    #[arg(help = "0-based position of the step in the checklist")]
    pub index: usize,
    #[arg(long = "by", help = "Who is recording the change")]
    pub completed_by: String,
}

impl From<ToggleStepArgs> for ToggleStep {
    fn from(val: ToggleStepArgs) -> Self {
        ToggleStep {
            id: val.id,
            index: val.index,
            completed_by: val.completed_by,
        }
    }
}

/// Import job records exported from another system
#[derive(Args)]
pub struct ImportJobsArgs {
    #[arg(help = "JSON file holding an array of job records")]
    pub file: PathBuf,
}

#[derive(Subcommand)]
pub enum JobCommands {
    /// Create a new job
    #[command(alias = "c")]
    Create(CreateJobArgs),
    /// List jobs
    #[command(aliases = ["l", "ls"])]
    List(ListJobsArgs),
    /// Show a job with its checklist
    #[command(alias = "s")]
    Show(JobIdArgs),
    /// Move a job to a new lifecycle status
    Status(UpdateStatusArgs),
    /// Assign or unassign a technician
    #[command(alias = "a")]
    Assign(AssignTechArgs),
    /// Change the workflow of a job
    #[command(alias = "w")]
    Workflow(SetWorkflowArgs),
    /// Toggle a checklist step
    #[command(alias = "t")]
    Toggle(ToggleStepArgs),
    /// Save the template checklist of a job that has none yet
    Commit(JobIdArgs),
    /// Save template checklists for every job that has none yet
    Backfill,
    /// Import job records from a JSON file
    Import(ImportJobsArgs),
}

/// Register a field technician
#[derive(Args)]
pub struct AddTechArgs {
    pub name: String,
    #[arg(help = "Email address; recorded on steps the completion form ticks off")]
    pub email: String,
}

impl From<AddTechArgs> for CreateTechnician {
    fn from(val: AddTechArgs) -> Self {
        CreateTechnician {
            name: val.name,
            email: val.email,
        }
    }
}

#[derive(Subcommand)]
pub enum TechCommands {
    /// Register a technician
    #[command(alias = "a")]
    Add(AddTechArgs),
    /// List technicians
    #[command(aliases = ["l", "ls"])]
    List,
}

/// Register a client
#[derive(Args)]
pub struct AddClientArgs {
    pub name: String,
    #[arg(long, help = "Workflow template new jobs for this client start with")]
    pub default_workflow: Option<String>,
}

impl From<AddClientArgs> for CreateClient {
    fn from(val: AddClientArgs) -> Self {
        CreateClient {
            name: val.name,
            default_workflow: val.default_workflow,
        }
    }
}

#[derive(Subcommand)]
pub enum ClientCommands {
    /// Register a client
    #[command(alias = "a")]
    Add(AddClientArgs),
    /// List clients
    #[command(aliases = ["l", "ls"])]
    List,
}

#[derive(Args)]
pub struct ShowFormArgs {
    #[arg(help = "Completion-form token of the job")]
    pub token: String,
}

impl From<ShowFormArgs> for Token {
    fn from(val: ShowFormArgs) -> Self {
        Token { token: val.token }
    }
}

/// Submit a technician's completion report
///
/// A completed report moves the job to scanned and ticks off the first scan
/// and upload steps of its checklist. A form can only be submitted once.
#[derive(Args)]
pub struct SubmitFormArgs {
    #[arg(help = "Completion-form token of the job")]
    pub token: String,
    #[arg(help = "Outcome of the capture")]
    pub status: CompletionArg,
    #[arg(
        long,
        help = "Why the capture was not finished (no-access, poc-no-show, poc-reschedule, other)"
    )]
    pub reason: Option<String>,
    #[arg(long, help = "Details about an unfinished capture")]
    pub notes: Option<String>,
    #[arg(long, help = "Feedback from the technician")]
    pub feedback: Option<String>,
    #[arg(long, help = "Date of the capture (YYYY-MM-DD)")]
    pub scanned_date: Option<String>,
}

impl From<SubmitFormArgs> for SubmitCompletionForm {
    fn from(val: SubmitFormArgs) -> Self {
        SubmitCompletionForm {
            token: val.token,
            submission: CompletionSubmission {
                completion_status: val.status.to_string(),
                incompletion_reason: val.reason,
                incompletion_notes: val.notes,
                tech_feedback: val.feedback,
                scanned_date: val.scanned_date,
            },
        }
    }
}

#[derive(Subcommand)]
pub enum FormCommands {
    /// Show what the technician sees on the form
    #[command(alias = "s")]
    Show(ShowFormArgs),
    /// Submit the completion report
    Submit(SubmitFormArgs),
}

/// Outcome reported on the completion form
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum CompletionArg {
    /// The capture was finished
    Completed,
    /// Part of the site was captured
    PartiallyCompleted,
    /// Nothing was captured
    NotCompleted,
}

impl fmt::Display for CompletionArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionArg::Completed => write!(f, "completed"),
            CompletionArg::PartiallyCompleted => write!(f, "partially-completed"),
            CompletionArg::NotCompleted => write!(f, "not-completed"),
        }
    }
}

/// Runs commands against the desk and renders their output.
pub struct Cli {
    desk: Desk,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(desk: Desk, renderer: TerminalRenderer) -> Self {
        Self { desk, renderer }
    }

    pub async fn handle_workflow_command(&self, command: WorkflowCommands) -> Result<()> {
        match command {
            WorkflowCommands::List => {
                let templates = self.desk.list_templates();
                self.renderer
                    .render(&format!("# Workflow Templates\n\n{templates}"))
            }
            WorkflowCommands::Show(args) => {
                let template = self
                    .desk
                    .get_template(&args.into())
                    .context("Failed to show workflow")?;
                self.renderer.render(&template.to_string())
            }
        }
    }

    pub async fn handle_job_command(&self, command: JobCommands) -> Result<()> {
        match command {
            JobCommands::Create(args) => self.create_job(&args.into()).await,
            JobCommands::List(args) => self.list_jobs(&args.into()).await,
            JobCommands::Show(args) => self.show_job(&args.into()).await,
            JobCommands::Status(args) => self.update_status(&args.into()).await,
            JobCommands::Assign(args) => self.assign_tech(&args.into()).await,
            JobCommands::Workflow(args) => self.set_workflow(&args.into()).await,
            JobCommands::Toggle(args) => self.toggle_step(&args.into()).await,
            JobCommands::Commit(args) => self.commit_workflow(&args.into()).await,
            JobCommands::Backfill => self.backfill().await,
            JobCommands::Import(args) => self.import_jobs(args.file).await,
        }
    }

    pub async fn handle_tech_command(&self, command: TechCommands) -> Result<()> {
        match command {
            TechCommands::Add(args) => {
                let tech = self
                    .desk
                    .add_technician(&args.into())
                    .await
                    .context("Failed to add technician")?;
                self.renderer.render(&CreateResult::new(tech).to_string())
            }
            TechCommands::List => {
                let techs: Technicians = self
                    .desk
                    .list_technicians()
                    .await
                    .context("Failed to list technicians")?;
                self.renderer.render(&format!("# Technicians\n\n{techs}"))
            }
        }
    }

    pub async fn handle_client_command(&self, command: ClientCommands) -> Result<()> {
        match command {
            ClientCommands::Add(args) => {
                let client = self
                    .desk
                    .add_client(&args.into())
                    .await
                    .context("Failed to add client")?;
                self.renderer.render(&CreateResult::new(client).to_string())
            }
            ClientCommands::List => {
                let clients: Clients = self
                    .desk
                    .list_clients()
                    .await
                    .context("Failed to list clients")?;
                self.renderer.render(&format!("# Clients\n\n{clients}"))
            }
        }
    }

    pub async fn handle_form_command(&self, command: FormCommands) -> Result<()> {
        match command {
            FormCommands::Show(args) => {
                let view = self
                    .desk
                    .completion_form(&args.into())
                    .await
                    .context("Failed to open completion form")?;
                self.renderer.render(&view.to_string())
            }
            FormCommands::Submit(args) => {
                let submission = self
                    .desk
                    .submit_completion_form(&args.into())
                    .await
                    .context("Failed to submit completion form")?;
                self.renderer.render(&submission.to_string())
            }
        }
    }

    pub async fn list_jobs(&self, params: &ListJobs) -> Result<()> {
        let jobs = self
            .desk
            .list_job_summaries(params)
            .await
            .context("Failed to list jobs")?;

        let title = match params.status.as_deref() {
            Some(status) => format!("Jobs in {status}"),
            None => "Jobs".to_string(),
        };
        self.renderer.render(&format!("# {title}\n\n{jobs}"))
    }

    async fn create_job(&self, params: &CreateJob) -> Result<()> {
        let job = self
            .desk
            .create_job(params)
            .await
            .context("Failed to create job")?;
        self.renderer.render(&CreateResult::new(job).to_string())
    }

    async fn show_job(&self, params: &Id) -> Result<()> {
        let job = self
            .desk
            .get_job(params)
            .await
            .with_context(|| format!("Failed to show job {}", params.id))?;
        self.renderer.render(&job.to_string())
    }

    async fn update_status(&self, params: &UpdateStatus) -> Result<()> {
        let change = self
            .desk
            .update_status(params)
            .await
            .context("Failed to update job status")?;
        self.renderer.render(&change.to_string())
    }

    async fn assign_tech(&self, params: &AssignTech) -> Result<()> {
        let job = self
            .desk
            .assign_tech(params)
            .await
            .context("Failed to assign technician")?;

        let change = match &job.tech {
            Some(tech) => format!("Assigned technician {tech}"),
            None => "Unassigned technician".to_string(),
        };
        self.renderer
            .render(&UpdateResult::with_changes(job, vec![change]).to_string())
    }

    async fn set_workflow(&self, params: &SetWorkflow) -> Result<()> {
        let job = self
            .desk
            .set_workflow_type(params)
            .await
            .context("Failed to change workflow")?;

        let change = match &job.workflow_type {
            Some(workflow_type) => format!(
                "Workflow set to `{workflow_type}` with {} steps",
                job.workflow_steps.len()
            ),
            None => "Workflow cleared".to_string(),
        };
        self.renderer
            .render(&UpdateResult::with_changes(job, vec![change]).to_string())
    }

    async fn toggle_step(&self, params: &ToggleStep) -> Result<()> {
        let job = self
            .desk
            .toggle_step(params)
            .await
            .context("Failed to toggle step")?;

        let changes = job
            .workflow_steps
            .get(params.index)
            .map(|step| {
                let state = if step.completed { "completed" } else { "reopened" };
                format!("Step {} ({}) {state}", params.index, step.step_name)
            })
            .into_iter()
            .collect();
        self.renderer
            .render(&UpdateResult::with_changes(job, changes).to_string())
    }

    async fn commit_workflow(&self, params: &Id) -> Result<()> {
        let job = self
            .desk
            .commit_workflow(params)
            .await
            .context("Failed to save checklist")?;
        self.renderer.render(&UpdateResult::new(job).to_string())
    }

    async fn backfill(&self) -> Result<()> {
        let jobs = self
            .desk
            .backfill_workflows()
            .await
            .context("Failed to backfill checklists")?;
        self.renderer
            .render(&job_list_status(&jobs, "Saved template checklists for"))
    }

    async fn import_jobs(&self, file: PathBuf) -> Result<()> {
        let data = fs::read_to_string(&file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let jobs = self
            .desk
            .import_jobs_json(&data)
            .await
            .with_context(|| format!("Failed to import jobs from {}", file.display()))?;
        self.renderer.render(&job_list_status(&jobs, "Imported"))
    }
}

fn job_list_status(jobs: &[Job], verb: &str) -> String {
    let mut output = OperationStatus::success(format!("{verb} {} jobs", jobs.len())).to_string();
    for job in jobs {
        output.push_str(&format!("- {} (ID: {})\n", job.job_number, job.id));
    }
    output
}
