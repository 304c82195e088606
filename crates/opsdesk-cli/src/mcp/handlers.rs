//! MCP tool handlers implementation

use log::debug;
use opsdesk_core::{
    display::{CreateResult, OperationStatus, UpdateResult},
    params as core, Desk, Job,
};
use rmcp::{
    handler::server::tool::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;

use super::to_mcp_error;

/// Generic MCP wrapper for core parameter types.
///
/// Deserializes transparently into the wrapped type and reuses its JSON
/// schema, so the core parameter structs need no MCP-specific derives.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type Id = McpParams<core::Id>;
pub type WorkflowLookup = McpParams<core::WorkflowLookup>;
pub type CreateJob = McpParams<core::CreateJob>;
pub type ListJobs = McpParams<core::ListJobs>;
pub type UpdateStatus = McpParams<core::UpdateStatus>;
pub type AssignTech = McpParams<core::AssignTech>;
pub type SetWorkflow = McpParams<core::SetWorkflow>;
pub type ToggleStep = McpParams<core::ToggleStep>;
pub type CreateTechnician = McpParams<core::CreateTechnician>;
pub type CreateClient = McpParams<core::CreateClient>;
pub type Token = McpParams<core::Token>;
pub type SubmitCompletionForm = McpParams<core::SubmitCompletionForm>;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn text(output: impl ToString) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(
        output.to_string(),
    )]))
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    desk: Desk,
}

impl McpHandlers {
    pub fn new(desk: Desk) -> Self {
        Self { desk }
    }

    pub async fn list_workflows(&self) -> McpResult {
        debug!("list_workflows");
        let templates = self.desk.list_templates();
        text(format!("# Workflow Templates\n\n{templates}"))
    }

    pub async fn show_workflow(
        &self,
        Parameters(params): Parameters<WorkflowLookup>,
    ) -> McpResult {
        debug!("show_workflow: {params:?}");
        let template = self
            .desk
            .get_template(params.as_ref())
            .map_err(|e| to_mcp_error("Failed to show workflow", &e))?;
        text(template)
    }

    pub async fn create_job(&self, Parameters(params): Parameters<CreateJob>) -> McpResult {
        debug!("create_job: {params:?}");
        let job = self
            .desk
            .create_job(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to create job", &e))?;
        text(CreateResult::new(job))
    }

    pub async fn list_jobs(&self, Parameters(params): Parameters<ListJobs>) -> McpResult {
        debug!("list_jobs: {params:?}");
        let inner_params = params.as_ref();
        let jobs = self
            .desk
            .list_job_summaries(inner_params)
            .await
            .map_err(|e| to_mcp_error("Failed to list jobs", &e))?;

        let title = match inner_params.status.as_deref() {
            Some(status) => format!("Jobs in {status}"),
            None => "Jobs".to_string(),
        };
        text(format!("# {title}\n\n{jobs}"))
    }

    pub async fn show_job(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_job: {params:?}");
        let job = self
            .desk
            .get_job(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to get job", &e))?;
        text(job)
    }

    pub async fn update_job_status(
        &self,
        Parameters(params): Parameters<UpdateStatus>,
    ) -> McpResult {
        debug!("update_job_status: {params:?}");
        let change = self
            .desk
            .update_status(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to update job status", &e))?;
        text(change)
    }

    pub async fn assign_tech(&self, Parameters(params): Parameters<AssignTech>) -> McpResult {
        debug!("assign_tech: {params:?}");
        let job = self
            .desk
            .assign_tech(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to assign technician", &e))?;

        let change = match &job.tech {
            Some(tech) => format!("Assigned technician {tech}"),
            None => "Unassigned technician".to_string(),
        };
        text(UpdateResult::with_changes(job, vec![change]))
    }

    pub async fn set_workflow_type(
        &self,
        Parameters(params): Parameters<SetWorkflow>,
    ) -> McpResult {
        debug!("set_workflow_type: {params:?}");
        let job = self
            .desk
            .set_workflow_type(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to change workflow", &e))?;

        let change = match &job.workflow_type {
            Some(workflow_type) => format!(
                "Workflow set to `{workflow_type}` with {} steps",
                job.workflow_steps.len()
            ),
            None => "Workflow cleared".to_string(),
        };
        text(UpdateResult::with_changes(job, vec![change]))
    }

    pub async fn toggle_step(&self, Parameters(params): Parameters<ToggleStep>) -> McpResult {
        debug!("toggle_step: {params:?}");
        let inner_params = params.as_ref();
        let job = self
            .desk
            .toggle_step(inner_params)
            .await
            .map_err(|e| to_mcp_error("Failed to toggle step", &e))?;

        let changes = job
            .workflow_steps
            .get(inner_params.index)
            .map(|step| {
                let state = if step.completed { "completed" } else { "reopened" };
                format!("Step {} ({}) {state}", inner_params.index, step.step_name)
            })
            .into_iter()
            .collect();
        text(UpdateResult::with_changes(job, changes))
    }

    pub async fn commit_workflow(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("commit_workflow: {params:?}");
        let job = self
            .desk
            .commit_workflow(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to save checklist", &e))?;
        text(UpdateResult::new(job))
    }

    pub async fn backfill_workflows(&self) -> McpResult {
        debug!("backfill_workflows");
        let jobs = self
            .desk
            .backfill_workflows()
            .await
            .map_err(|e| to_mcp_error("Failed to backfill checklists", &e))?;
        text(job_list_status(&jobs))
    }

    pub async fn add_technician(
        &self,
        Parameters(params): Parameters<CreateTechnician>,
    ) -> McpResult {
        debug!("add_technician: {params:?}");
        let tech = self
            .desk
            .add_technician(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to add technician", &e))?;
        text(CreateResult::new(tech))
    }

    pub async fn list_technicians(&self) -> McpResult {
        debug!("list_technicians");
        let techs = self
            .desk
            .list_technicians()
            .await
            .map_err(|e| to_mcp_error("Failed to list technicians", &e))?;
        text(format!("# Technicians\n\n{techs}"))
    }

    pub async fn add_client(&self, Parameters(params): Parameters<CreateClient>) -> McpResult {
        debug!("add_client: {params:?}");
        let client = self
            .desk
            .add_client(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to add client", &e))?;
        text(CreateResult::new(client))
    }

    pub async fn list_clients(&self) -> McpResult {
        debug!("list_clients");
        let clients = self
            .desk
            .list_clients()
            .await
            .map_err(|e| to_mcp_error("Failed to list clients", &e))?;
        text(format!("# Clients\n\n{clients}"))
    }

    pub async fn show_completion_form(&self, Parameters(params): Parameters<Token>) -> McpResult {
        // Tokens are credentials; never log them.
        debug!("show_completion_form");
        let view = self
            .desk
            .completion_form(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to open completion form", &e))?;
        text(view)
    }

    pub async fn submit_completion_form(
        &self,
        Parameters(params): Parameters<SubmitCompletionForm>,
    ) -> McpResult {
        debug!(
            "submit_completion_form: {}",
            params.as_ref().submission.completion_status
        );
        let submission = self
            .desk
            .submit_completion_form(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to submit completion form", &e))?;
        text(submission)
    }
}

fn job_list_status(jobs: &[Job]) -> String {
    let mut output =
        OperationStatus::success(format!("Saved template checklists for {} jobs", jobs.len()))
            .to_string();
    for job in jobs {
        output.push_str(&format!("- {} (ID: {})\n", job.job_number, job.id));
    }
    output
}
