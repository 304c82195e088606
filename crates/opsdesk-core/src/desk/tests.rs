//! Tests for the desk module.

use tempfile::TempDir;

use super::*;
use crate::{
    models::JobStatus,
    params::{
        AssignTech, CreateClient, CreateJob, CreateTechnician, Id, ListJobs, SetWorkflow,
        ToggleStep, UpdateStatus,
    },
};

async fn create_test_desk(policy: BackfillPolicy) -> (TempDir, Desk) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let desk = DeskBuilder::new()
        .with_database_path(temp_dir.path().join("test.db"))
        .with_backfill_policy(policy)
        .build()
        .await
        .expect("Failed to create desk");
    (temp_dir, desk)
}

fn new_job(number: &str, workflow_type: Option<&str>) -> CreateJob {
    CreateJob {
        job_number: number.to_string(),
        model_name: format!("Model {number}"),
        workflow_type: workflow_type.map(String::from),
        ..Default::default()
    }
}

/// Imports a job that names a workflow but has no saved checklist.
async fn legacy_job(desk: &Desk, workflow_type: &str) -> Job {
    let job: Job = serde_json::from_value(serde_json::json!({
        "id": 0,
        "job_number": "LEGACY-1",
        "model_name": "Old Mill",
        "status": "scheduled",
        "workflow_type": workflow_type,
        "created_at": "2025-06-01T12:00:00Z",
        "updated_at": "2025-06-01T12:00:00Z"
    }))
    .expect("valid legacy record");
    desk.import_jobs(vec![job])
        .await
        .expect("Failed to import")
        .remove(0)
}

#[tokio::test]
async fn test_create_job_commits_checklist() {
    let (_dir, desk) = create_test_desk(BackfillPolicy::Lazy).await;

    let job = desk
        .create_job(&new_job("J-1", Some("direct-scan-transfer")))
        .await
        .unwrap();

    assert_eq!(job.status, JobStatus::Request);
    assert_eq!(job.workflow_steps.len(), 6);
    assert!(!job.needs_backfill());
    assert_eq!(job.completion_token.as_deref().map(str::len), Some(64));
}

#[tokio::test]
async fn test_create_job_inherits_client_default_workflow() {
    let (_dir, desk) = create_test_desk(BackfillPolicy::Lazy).await;
    let client = desk
        .add_client(&CreateClient {
            name: "Acme Realty".to_string(),
            default_workflow: Some("direct-scan-hosted".to_string()),
        })
        .await
        .unwrap();

    let mut params = new_job("J-2", None);
    params.client_id = Some(client.id);
    let job = desk.create_job(&params).await.unwrap();
    assert_eq!(job.workflow_type.as_deref(), Some("direct-scan-hosted"));
    assert_eq!(job.workflow_steps.len(), 7);

    // An explicit type wins over the client's default.
    params.workflow_type = Some("outsourced-scan-transfer".to_string());
    let job = desk.create_job(&params).await.unwrap();
    assert_eq!(job.workflow_steps.len(), 4);
}

#[tokio::test]
async fn test_create_job_for_missing_client_fails() {
    let (_dir, desk) = create_test_desk(BackfillPolicy::Lazy).await;
    let mut params = new_job("J-3", None);
    params.client_id = Some(99);

    assert!(matches!(
        desk.create_job(&params).await,
        Err(DeskError::ClientNotFound { id: 99 })
    ));
}

#[tokio::test]
async fn test_toggle_step_rejects_out_of_range_index() {
    let (_dir, desk) = create_test_desk(BackfillPolicy::Lazy).await;
    let job = desk
        .create_job(&new_job("J-4", Some("outsourced-scan-upload-client")))
        .await
        .unwrap();

    let result = desk
        .toggle_step(&ToggleStep {
            id: job.id,
            index: 3,
            completed_by: "ops@example.com".to_string(),
        })
        .await;
    assert!(matches!(
        result,
        Err(DeskError::InvalidInput { ref field, .. }) if field == "index"
    ));

    let unchanged = desk.get_job(&Id { id: job.id }).await.unwrap();
    assert_eq!(unchanged.workflow_steps, job.workflow_steps);
}

#[tokio::test]
async fn test_toggle_step_requires_actor() {
    let (_dir, desk) = create_test_desk(BackfillPolicy::Lazy).await;
    let job = desk
        .create_job(&new_job("J-5", Some("outsourced-scan-upload-client")))
        .await
        .unwrap();

    let result = desk
        .toggle_step(&ToggleStep {
            id: job.id,
            index: 0,
            completed_by: "  ".to_string(),
        })
        .await;
    assert!(matches!(result, Err(DeskError::InvalidInput { .. })));
}

#[tokio::test]
async fn test_toggle_on_legacy_job_commits_displayed_checklist() {
    let (_dir, desk) = create_test_desk(BackfillPolicy::Lazy).await;
    let legacy = legacy_job(&desk, "direct-scan-hosted").await;
    assert!(legacy.workflow_steps.is_empty());

    let job = desk
        .toggle_step(&ToggleStep {
            id: legacy.id,
            index: 2,
            completed_by: "qc@example.com".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(job.workflow_steps.len(), 7);
    assert!(job.workflow_steps[2].completed);
    assert_eq!(job.workflow_steps[2].step_name, "Quality Check");
    assert_eq!(progress::percentage(&job.workflow_steps), 14);
}

#[tokio::test]
async fn test_lazy_policy_never_writes_on_read() {
    let (_dir, desk) = create_test_desk(BackfillPolicy::Lazy).await;
    let legacy = legacy_job(&desk, "direct-scan-floorplan").await;

    let job = desk.get_job(&Id { id: legacy.id }).await.unwrap();
    assert!(job.workflow_steps.is_empty());

    let summaries = desk.list_job_summaries(&ListJobs::default()).await.unwrap();
    assert_eq!(summaries[0].progress.total, 9);

    let again = desk.get_job(&Id { id: legacy.id }).await.unwrap();
    assert!(again.workflow_steps.is_empty());
}

#[tokio::test]
async fn test_eager_policy_commits_on_first_read() {
    let (_dir, desk) = create_test_desk(BackfillPolicy::Eager).await;
    let legacy = legacy_job(&desk, "direct-scan-floorplan").await;

    let job = desk.get_job(&Id { id: legacy.id }).await.unwrap();
    assert_eq!(job.workflow_steps.len(), 9);
    assert!(!job.needs_backfill());
}

#[tokio::test]
async fn test_commit_workflow_is_idempotent() {
    let (_dir, desk) = create_test_desk(BackfillPolicy::Lazy).await;
    let legacy = legacy_job(&desk, "outsourced-scan-transfer").await;

    let first = desk.commit_workflow(&Id { id: legacy.id }).await.unwrap();
    let second = desk.commit_workflow(&Id { id: legacy.id }).await.unwrap();
    assert_eq!(first.workflow_steps.len(), 4);
    assert_eq!(first.workflow_steps, second.workflow_steps);
}

#[tokio::test]
async fn test_set_workflow_type_validates_and_resets() {
    let (_dir, desk) = create_test_desk(BackfillPolicy::Lazy).await;
    let job = desk
        .create_job(&new_job("J-6", Some("direct-scan-hosted")))
        .await
        .unwrap();
    desk.toggle_step(&ToggleStep {
        id: job.id,
        index: 0,
        completed_by: "ops@example.com".to_string(),
    })
    .await
    .unwrap();

    let unknown = desk
        .set_workflow_type(&SetWorkflow {
            id: job.id,
            workflow_type: Some("scan-it-all".to_string()),
        })
        .await;
    assert!(matches!(unknown, Err(DeskError::UnknownWorkflowType { .. })));

    let switched = desk
        .set_workflow_type(&SetWorkflow {
            id: job.id,
            workflow_type: Some("direct-scan-asbuilts".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(switched.workflow_steps.len(), 10);
    assert!(switched.workflow_steps.iter().all(|s| !s.completed));

    let cleared = desk
        .set_workflow_type(&SetWorkflow {
            id: job.id,
            workflow_type: None,
        })
        .await
        .unwrap();
    assert!(cleared.workflow_type.is_none());
    assert!(cleared.workflow_steps.is_empty());
}

#[tokio::test]
async fn test_update_status_reports_invoicing() {
    let (_dir, desk) = create_test_desk(BackfillPolicy::Lazy).await;
    let job = desk.create_job(&new_job("J-7", None)).await.unwrap();

    let change = desk
        .update_status(&UpdateStatus {
            id: job.id,
            status: "done".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(change.job.status, JobStatus::Done);
    assert!(matches!(
        change.events.as_slice(),
        [crate::events::JobEvent::ReadyForInvoicing { .. }]
    ));
}

#[tokio::test]
async fn test_assign_and_unassign_technician() {
    let (_dir, desk) = create_test_desk(BackfillPolicy::Lazy).await;
    let job = desk.create_job(&new_job("J-8", None)).await.unwrap();
    let tech = desk
        .add_technician(&CreateTechnician {
            name: "Sam Field".to_string(),
            email: "sam@example.com".to_string(),
        })
        .await
        .unwrap();

    let assigned = desk
        .assign_tech(&AssignTech {
            id: job.id,
            tech_id: Some(tech.id),
        })
        .await
        .unwrap();
    assert_eq!(assigned.tech_email(), Some("sam@example.com"));

    let missing = desk
        .assign_tech(&AssignTech {
            id: job.id,
            tech_id: Some(tech.id + 100),
        })
        .await;
    assert!(matches!(missing, Err(DeskError::TechnicianNotFound { .. })));

    let unassigned = desk
        .assign_tech(&AssignTech {
            id: job.id,
            tech_id: None,
        })
        .await
        .unwrap();
    assert!(unassigned.tech.is_none());
}

#[tokio::test]
async fn test_get_template() {
    let (_dir, desk) = create_test_desk(BackfillPolicy::Lazy).await;
    let template = desk
        .get_template(&crate::params::WorkflowLookup {
            workflow_type: "direct-scan-floorplan-photos".to_string(),
        })
        .unwrap();
    assert_eq!(template.steps.len(), 13);
    assert_eq!(desk.list_templates().0.len(), 8);
}
