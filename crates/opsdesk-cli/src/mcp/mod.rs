//! MCP server implementation for Opsdesk
//!
//! Exposes the desk operations as Model Context Protocol tools over stdio,
//! so AI assistants can manage jobs, checklists and completion forms.

use anyhow::Result;
use log::{debug, error, info};
use opsdesk_core::Desk;
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use std::future::Future;

use tokio::signal::unix::{signal, SignalKind};

pub mod errors;
pub mod handlers;

pub use errors::to_mcp_error;
pub use handlers::{
    AssignTech, CreateClient, CreateJob, CreateTechnician, Id, ListJobs, McpHandlers, McpResult,
    SetWorkflow, SubmitCompletionForm, ToggleStep, Token, UpdateStatus, WorkflowLookup,
};

const INSTRUCTIONS: &str = r#"Opsdesk tracks 3D scanning jobs through checklists built from a fixed catalog of workflow templates.

## Core Concepts
- **Workflow templates**: eight fixed checklists (e.g. `direct-scan-hosted`), listed by `list_workflows`
- **Jobs**: a capture at a site, with a lifecycle status (request, scheduled, scanned, qc, done, archived) and a checklist copied from its template
- **Completion form**: each job has a secret token; technicians report the capture through `submit_completion_form` exactly once

## Workflow Examples

### Setting Up a Job
1. Register the technician with `add_technician` and the client with `add_client`
2. Create the job with `create_job`; it gets its template checklist and a completion token
3. Assign the technician with `assign_tech`

### Tracking Progress
1. `list_jobs` shows progress per job as completed/total steps
2. `toggle_step` marks a checklist step done or not done, by 0-based index, recording who did it
3. `update_job_status` moves the job along; notifications triggered by the change are listed in the result

### Technician Report
A `completed` report moves the job to scanned and ticks off the first scan step and the first upload step of the checklist on the technician's behalf.

## Notes
- `set_workflow_type` replaces the checklist and discards recorded progress
- Jobs imported without a saved checklist show their template's steps; `commit_workflow` or `backfill_workflows` saves them"#;

/// MCP server for Opsdesk
#[derive(Clone)]
pub struct OpsdeskMcpServer {
    desk: Desk,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl OpsdeskMcpServer {
    pub fn new(desk: Desk) -> Self {
        Self {
            desk,
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> McpHandlers {
        McpHandlers::new(self.desk.clone())
    }

    #[tool(
        name = "list_workflows",
        description = "List the workflow templates available for jobs, with their catalog keys and step counts."
    )]
    async fn list_workflows(&self) -> McpResult {
        self.handlers().list_workflows().await
    }

    #[tool(
        name = "show_workflow",
        description = "Show the ordered steps of one workflow template, with the role responsible for each step. Identify the template by its catalog key, e.g. 'direct-scan-hosted'."
    )]
    async fn show_workflow(&self, params: Parameters<WorkflowLookup>) -> McpResult {
        self.handlers().show_workflow(params).await
    }

    #[tool(
        name = "create_job",
        description = "Create a scanning job. Requires job_number and model_name. Optional: client_id, workflow_type (defaults to the client's default workflow), target_date (YYYY-MM-DD), capture_address, city, state. Returns the job with its checklist and its completion-form token."
    )]
    async fn create_job(&self, params: Parameters<CreateJob>) -> McpResult {
        self.handlers().create_job(params).await
    }

    #[tool(
        name = "list_jobs",
        description = "List jobs newest first with checklist progress. Optional filters: status, workflow_type, tech_id. Archived jobs are hidden unless status is 'archived' or include_archived is true."
    )]
    async fn list_jobs(&self, params: Parameters<ListJobs>) -> McpResult {
        self.handlers().list_jobs(params).await
    }

    #[tool(
        name = "show_job",
        description = "Show a job with its site details, technician report and full checklist, each step numbered by the 0-based index used by toggle_step."
    )]
    async fn show_job(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().show_job(params).await
    }

    #[tool(
        name = "update_job_status",
        description = "Move a job to a new lifecycle status: request, scheduled, scanned, qc, done or archived. Returns the notifications the change triggers, e.g. ready for invoicing when a job reaches done."
    )]
    async fn update_job_status(&self, params: Parameters<UpdateStatus>) -> McpResult {
        self.handlers().update_job_status(params).await
    }

    #[tool(
        name = "assign_tech",
        description = "Assign a registered technician to a job by tech_id, or unassign by omitting tech_id. The technician's email is recorded on steps completed by their completion form."
    )]
    async fn assign_tech(&self, params: Parameters<AssignTech>) -> McpResult {
        self.handlers().assign_tech(params).await
    }

    #[tool(
        name = "set_workflow_type",
        description = "Change the workflow template of a job. The checklist is replaced with the new template's steps and ALL recorded progress is discarded. Omit workflow_type to clear the workflow."
    )]
    async fn set_workflow_type(&self, params: Parameters<SetWorkflow>) -> McpResult {
        self.handlers().set_workflow_type(params).await
    }

    #[tool(
        name = "toggle_step",
        description = "Flip one checklist step between done and not done. index is 0-based as shown by show_job; completed_by records who made the change and is required."
    )]
    async fn toggle_step(&self, params: Parameters<ToggleStep>) -> McpResult {
        self.handlers().toggle_step(params).await
    }

    #[tool(
        name = "commit_workflow",
        description = "Save the template checklist of a job that names a workflow but has no saved checklist yet. Does nothing for jobs whose checklist is already saved."
    )]
    async fn commit_workflow(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().commit_workflow(params).await
    }

    #[tool(
        name = "backfill_workflows",
        description = "Save template checklists for every job that names a workflow but has no saved checklist. Returns the jobs that were updated."
    )]
    async fn backfill_workflows(&self) -> McpResult {
        self.handlers().backfill_workflows().await
    }

    #[tool(
        name = "add_technician",
        description = "Register a field technician with a name and a unique email address."
    )]
    async fn add_technician(&self, params: Parameters<CreateTechnician>) -> McpResult {
        self.handlers().add_technician(params).await
    }

    #[tool(
        name = "list_technicians",
        description = "List registered technicians with their IDs and emails."
    )]
    async fn list_technicians(&self) -> McpResult {
        self.handlers().list_technicians().await
    }

    #[tool(
        name = "add_client",
        description = "Register a client. Optional default_workflow is used for new jobs of this client that do not name a workflow."
    )]
    async fn add_client(&self, params: Parameters<CreateClient>) -> McpResult {
        self.handlers().add_client(params).await
    }

    #[tool(
        name = "list_clients",
        description = "List registered clients with their default workflows."
    )]
    async fn list_clients(&self) -> McpResult {
        self.handlers().list_clients().await
    }

    #[tool(
        name = "show_completion_form",
        description = "Show what a technician sees on the completion form for a token: job number, model name, target date and address, and whether the form was already submitted."
    )]
    async fn show_completion_form(&self, params: Parameters<Token>) -> McpResult {
        self.handlers().show_completion_form(params).await
    }

    #[tool(
        name = "submit_completion_form",
        description = "Submit a technician's completion report for a token. completion_status is 'completed', 'partially-completed' or 'not-completed'. Optional: incompletion_reason (no-access, poc-no-show, poc-reschedule, other), incompletion_notes, tech_feedback, scanned_date (YYYY-MM-DD). A completed report moves the job to scanned and completes its first scan and upload steps. Each form can be submitted once."
    )]
    async fn submit_completion_form(&self, params: Parameters<SubmitCompletionForm>) -> McpResult {
        self.handlers().submit_completion_form(params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for OpsdeskMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "opsdesk".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: OpsdeskMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Opsdesk MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_desk_operation_is_a_tool() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let desk = opsdesk_core::DeskBuilder::new()
            .with_database_path(dir.path().join("mcp.db"))
            .build()
            .await
            .expect("Failed to create desk");

        let server = OpsdeskMcpServer::new(desk);
        let names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();

        assert_eq!(names.len(), 17);
        for name in ["create_job", "toggle_step", "submit_completion_form"] {
            assert!(names.iter().any(|n| n == name), "missing tool {name}");
        }
    }
}
