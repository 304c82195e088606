#![allow(dead_code)]

use opsdesk_core::{BackfillPolicy, Desk, DeskBuilder, Job};
use tempfile::TempDir;

/// Helper function to create a test desk
pub async fn create_test_desk() -> (TempDir, Desk) {
    create_test_desk_with(BackfillPolicy::Lazy).await
}

/// Helper function to create a test desk with a backfill policy
pub async fn create_test_desk_with(policy: BackfillPolicy) -> (TempDir, Desk) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let desk = DeskBuilder::new()
        .with_database_path(&db_path)
        .with_backfill_policy(policy)
        .build()
        .await
        .expect("Failed to create desk");
    (temp_dir, desk)
}

/// A job record in the shape older systems exported: steps by name only, no
/// kind tags.
pub fn legacy_job(job_number: &str, workflow_type: Option<&str>, step_names: &[&str]) -> Job {
    let steps: Vec<serde_json::Value> = step_names
        .iter()
        .map(|name| serde_json::json!({ "step_name": name, "completed": false }))
        .collect();

    serde_json::from_value(serde_json::json!({
        "id": 0,
        "job_number": job_number,
        "model_name": format!("Model {job_number}"),
        "status": "scheduled",
        "workflow_type": workflow_type,
        "workflow_steps": steps,
        "created_at": "2025-06-01T12:00:00Z",
        "updated_at": "2025-06-01T12:00:00Z"
    }))
    .expect("valid legacy job record")
}
