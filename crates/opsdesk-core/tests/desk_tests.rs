mod common;

use common::{create_test_desk, create_test_desk_with, legacy_job};
use opsdesk_core::{
    automation::AUTO_COMPLETE_NOTE,
    params::{
        AssignTech, CompletionSubmission, CreateJob, CreateTechnician, Id, ListJobs,
        SubmitCompletionForm, Token,
    },
    BackfillPolicy, CompletionStatus, DeskError, IncompletionReason, JobEvent, JobStatus, Role,
};

fn submission(token: &str, status: &str) -> SubmitCompletionForm {
    SubmitCompletionForm {
        token: token.to_string(),
        submission: CompletionSubmission {
            completion_status: status.to_string(),
            incompletion_reason: None,
            incompletion_notes: None,
            tech_feedback: None,
            scanned_date: Some("2026-01-15".to_string()),
        },
    }
}

#[tokio::test]
async fn test_hosted_job_without_steps_shows_template_checklist() {
    let (_dir, desk) = create_test_desk().await;
    let imported = desk
        .import_jobs(vec![legacy_job("A-1", Some("direct-scan-hosted"), &[])])
        .await
        .expect("Failed to import");

    let job = desk.get_job(&Id { id: imported[0].id }).await.unwrap();
    let steps = opsdesk_core::progress::materialize(&job);

    let names: Vec<&str> = steps.iter().map(|s| s.step_name.as_str()).collect();
    assert_eq!(
        names,
        [
            "Scan Completed",
            "Upload to Our Account",
            "Quality Check",
            "Confirm Square Footage",
            "Send Link to Customer",
            "Invoice Job",
            "Add Recurring Hosting Invoice",
        ]
    );
    assert!(steps.iter().all(|s| !s.completed));
}

#[tokio::test]
async fn test_completed_form_without_tech_marks_scan_and_upload() {
    let (_dir, desk) = create_test_desk().await;
    let imported = desk
        .import_jobs(vec![legacy_job(
            "B-1",
            None,
            &["Scan Completed", "Upload to Client Account", "Confirm Upload"],
        )])
        .await
        .unwrap();
    let token = imported[0].completion_token.clone().unwrap();

    let result = desk
        .submit_completion_form(&submission(&token, "completed"))
        .await
        .expect("Failed to submit form");

    assert_eq!(result.automation.completed_indices, vec![0, 1]);

    let job = desk.get_job(&Id { id: imported[0].id }).await.unwrap();
    let steps = &job.workflow_steps;
    for step in &steps[..2] {
        assert!(step.completed);
        assert_eq!(step.completed_by.as_deref(), Some("Tech"));
        assert!(step.completed_at.is_some());
        assert_eq!(step.notes, AUTO_COMPLETE_NOTE);
    }
    assert!(!steps[2].completed);
    assert!(steps[2].completed_by.is_none());

    assert_eq!(job.status, JobStatus::Scanned);
    assert_eq!(job.completion_status, Some(CompletionStatus::Completed));
    assert!(job.completion_form_submitted);
    assert_eq!(job.scanned_date, Some(jiff::civil::date(2026, 1, 15)));
}

#[tokio::test]
async fn test_completed_form_records_tech_email() {
    let (_dir, desk) = create_test_desk().await;
    let tech = desk
        .add_technician(&CreateTechnician {
            name: "Field Tech".to_string(),
            email: "tech@example.com".to_string(),
        })
        .await
        .unwrap();
    let imported = desk
        .import_jobs(vec![legacy_job(
            "C-1",
            None,
            &["Scan Completed", "Upload to Client Account", "Confirm Upload"],
        )])
        .await
        .unwrap();
    desk.assign_tech(&AssignTech {
        id: imported[0].id,
        tech_id: Some(tech.id),
    })
    .await
    .unwrap();

    let token = imported[0].completion_token.clone().unwrap();
    let result = desk
        .submit_completion_form(&submission(&token, "completed"))
        .await
        .unwrap();

    let steps = &result.job.workflow_steps;
    assert_eq!(steps[0].completed_by.as_deref(), Some("tech@example.com"));
    assert_eq!(steps[1].completed_by.as_deref(), Some("tech@example.com"));
    assert!(!steps[2].completed);
}

#[tokio::test]
async fn test_completed_form_with_unrelated_steps_changes_nothing() {
    let (_dir, desk) = create_test_desk().await;
    let imported = desk
        .import_jobs(vec![legacy_job("D-1", None, &["Request Floor Plan"])])
        .await
        .unwrap();
    let token = imported[0].completion_token.clone().unwrap();

    let result = desk
        .submit_completion_form(&submission(&token, "completed"))
        .await
        .unwrap();

    assert!(result.automation.is_empty());
    let job = desk.get_job(&Id { id: imported[0].id }).await.unwrap();
    assert_eq!(job.workflow_steps, imported[0].workflow_steps);
    assert_eq!(job.status, JobStatus::Scanned);
}

#[tokio::test]
async fn test_completed_form_on_job_without_checklist_does_not_materialize() {
    let (_dir, desk) = create_test_desk().await;
    let imported = desk
        .import_jobs(vec![legacy_job("D-2", Some("direct-scan-hosted"), &[])])
        .await
        .unwrap();
    let token = imported[0].completion_token.clone().unwrap();

    let result = desk
        .submit_completion_form(&submission(&token, "completed"))
        .await
        .unwrap();

    assert!(result.automation.is_empty());
    assert!(result.job.workflow_steps.is_empty());
    let job = desk.get_job(&Id { id: imported[0].id }).await.unwrap();
    assert!(job.workflow_steps.is_empty());
}

#[tokio::test]
async fn test_catalog_job_automation_uses_step_kinds() {
    let (_dir, desk) = create_test_desk().await;
    let job = desk
        .create_job(&CreateJob {
            job_number: "K-1".to_string(),
            model_name: "Gallery".to_string(),
            workflow_type: Some("direct-scan-floorplan-photos".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let result = desk
        .submit_completion_form(&submission(job.completion_token.as_deref().unwrap(), "completed"))
        .await
        .unwrap();

    assert_eq!(result.automation.completed_indices, vec![0, 1]);
    assert!(!result.job.workflow_steps[8].completed);
    assert_eq!(
        opsdesk_core::progress::percentage(&result.job.workflow_steps),
        15
    );
}

#[tokio::test]
async fn test_incomplete_form_keeps_status_and_notifies_admins() {
    let (_dir, desk) = create_test_desk().await;
    let job = desk
        .create_job(&CreateJob {
            job_number: "I-1".to_string(),
            model_name: "Depot".to_string(),
            workflow_type: Some("outsourced-scan-upload-client".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let mut params = submission(job.completion_token.as_deref().unwrap(), "not-completed");
    params.submission.incompletion_reason = Some("poc-no-show".to_string());
    params.submission.incompletion_notes = Some("Waited 45 minutes".to_string());

    let result = desk.submit_completion_form(&params).await.unwrap();

    assert!(result.automation.is_empty());
    assert_eq!(result.job.status, JobStatus::Request);
    assert_eq!(
        result.job.incompletion_reason,
        Some(IncompletionReason::PocNoShow)
    );
    assert!(result.job.workflow_steps.iter().all(|s| !s.completed));
    assert_eq!(result.events.len(), 1);
    assert!(matches!(result.events[0], JobEvent::Incomplete { .. }));
    assert_eq!(
        result.events[0].recipients(),
        &[Role::SuperAdmin, Role::OpsManager]
    );
}

#[tokio::test]
async fn test_completed_form_notifies_post_production() {
    let (_dir, desk) = create_test_desk().await;
    let job = desk
        .create_job(&CreateJob {
            job_number: "Q-1".to_string(),
            model_name: "Depot".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let result = desk
        .submit_completion_form(&submission(job.completion_token.as_deref().unwrap(), "completed"))
        .await
        .unwrap();

    assert!(result
        .events
        .iter()
        .any(|e| matches!(e, JobEvent::ReadyForQc { .. })));
}

#[tokio::test]
async fn test_unknown_token_fails_closed() {
    let (_dir, desk) = create_test_desk().await;
    desk.create_job(&CreateJob {
        job_number: "T-1".to_string(),
        model_name: "Depot".to_string(),
        ..Default::default()
    })
    .await
    .unwrap();

    let view = desk
        .completion_form(&Token {
            token: "0".repeat(64),
        })
        .await;
    assert!(matches!(view, Err(DeskError::TokenNotFound)));

    let submit = desk
        .submit_completion_form(&submission(&"0".repeat(64), "completed"))
        .await;
    let err = submit.unwrap_err();
    assert!(matches!(err, DeskError::TokenNotFound));
    assert_eq!(err.to_string(), "Invalid or expired token");
}

#[tokio::test]
async fn test_form_can_only_be_submitted_once() {
    let (_dir, desk) = create_test_desk().await;
    let job = desk
        .create_job(&CreateJob {
            job_number: "S-1".to_string(),
            model_name: "Depot".to_string(),
            workflow_type: Some("outsourced-scan-upload-client".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let token = job.completion_token.clone().unwrap();

    desk.submit_completion_form(&submission(&token, "partially-completed"))
        .await
        .unwrap();

    let again = desk
        .submit_completion_form(&submission(&token, "completed"))
        .await;
    assert!(matches!(again, Err(DeskError::FormAlreadySubmitted)));

    let stored = desk.get_job(&Id { id: job.id }).await.unwrap();
    assert_eq!(
        stored.completion_status,
        Some(CompletionStatus::PartiallyCompleted)
    );
    assert!(stored.workflow_steps.iter().all(|s| !s.completed));

    let view = desk.completion_form(&Token { token }).await.unwrap();
    assert!(view.already_submitted);
}

#[tokio::test]
async fn test_invalid_submission_is_rejected_before_any_write() {
    let (_dir, desk) = create_test_desk().await;
    let job = desk
        .create_job(&CreateJob {
            job_number: "V-1".to_string(),
            model_name: "Depot".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let token = job.completion_token.clone().unwrap();

    let result = desk.submit_completion_form(&submission(&token, "finished")).await;
    assert!(matches!(result, Err(DeskError::InvalidInput { .. })));

    let view = desk.completion_form(&Token { token }).await.unwrap();
    assert!(!view.already_submitted);
}

#[tokio::test]
async fn test_completion_form_view_exposes_site_details_only() {
    let (_dir, desk) = create_test_desk().await;
    let job = desk
        .create_job(&CreateJob {
            job_number: "F-1".to_string(),
            model_name: "Boathouse".to_string(),
            target_date: Some("2026-03-10".to_string()),
            capture_address: Some("1 Quay St".to_string()),
            city: Some("Bristol".to_string()),
            state: Some("RI".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let view = desk
        .completion_form(&Token {
            token: job.completion_token.unwrap(),
        })
        .await
        .unwrap();

    assert_eq!(view.job_number, "F-1");
    assert_eq!(view.model_name, "Boathouse");
    assert_eq!(view.target_date, Some(jiff::civil::date(2026, 3, 10)));
    assert_eq!(view.city.as_deref(), Some("Bristol"));
    assert!(!view.already_submitted);
}

#[tokio::test]
async fn test_backfill_commits_only_legacy_catalog_jobs() {
    let (_dir, desk) = create_test_desk().await;
    let imported = desk
        .import_jobs(vec![
            legacy_job("L-1", Some("direct-scan-hosted"), &[]),
            legacy_job("L-2", Some("retired-workflow"), &[]),
            legacy_job("L-3", None, &[]),
            legacy_job("L-4", Some("direct-scan-transfer"), &["Scan Completed"]),
        ])
        .await
        .unwrap();

    let backfilled = desk.backfill_workflows().await.unwrap();
    assert_eq!(backfilled.len(), 1);
    assert_eq!(backfilled[0].id, imported[0].id);

    let job = desk.get_job(&Id { id: imported[0].id }).await.unwrap();
    assert_eq!(job.workflow_steps.len(), 7);

    // Saved checklists are never regenerated.
    let kept = desk.get_job(&Id { id: imported[3].id }).await.unwrap();
    assert_eq!(kept.workflow_steps.len(), 1);

    assert!(desk.backfill_workflows().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_eager_listing_commits_legacy_checklists() {
    let (_dir, desk) = create_test_desk_with(BackfillPolicy::Eager).await;
    let imported = desk
        .import_jobs(vec![legacy_job("E-1", Some("outsourced-scan-transfer"), &[])])
        .await
        .unwrap();

    let jobs = desk.list_jobs(&ListJobs::default()).await.unwrap();
    assert_eq!(jobs[0].workflow_steps.len(), 4);

    let stored = desk.get_job(&Id { id: imported[0].id }).await.unwrap();
    assert_eq!(stored.workflow_steps.len(), 4);
}

#[tokio::test]
async fn test_list_jobs_filters() {
    let (_dir, desk) = create_test_desk().await;
    for (number, workflow) in [
        ("N-1", Some("direct-scan-hosted")),
        ("N-2", Some("direct-scan-transfer")),
        ("N-3", None),
    ] {
        desk.create_job(&CreateJob {
            job_number: number.to_string(),
            model_name: "Depot".to_string(),
            workflow_type: workflow.map(String::from),
            ..Default::default()
        })
        .await
        .unwrap();
    }

    let hosted = desk
        .list_jobs(&ListJobs {
            workflow_type: Some("direct-scan-hosted".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(hosted.len(), 1);
    assert_eq!(hosted[0].job_number, "N-1");

    let bad = desk
        .list_jobs(&ListJobs {
            status: Some("finished".to_string()),
            ..Default::default()
        })
        .await;
    assert!(matches!(bad, Err(DeskError::InvalidInput { .. })));
}

#[tokio::test]
async fn test_import_jobs_from_json() {
    let (_dir, desk) = create_test_desk().await;
    let json = r#"[
        {
            "id": 900,
            "job_number": "OLD-7",
            "model_name": "Boathouse",
            "workflow_type": "outsourced-scan-upload-client",
            "workflow_steps": [
                { "step_name": "Scan Completed", "completed": true, "completed_by": "ops@example.com" }
            ],
            "created_at": "2025-03-01T09:00:00Z",
            "updated_at": "2025-03-02T09:00:00Z"
        }
    ]"#;

    let imported = desk.import_jobs_json(json).await.expect("Failed to import");
    assert_eq!(imported.len(), 1);
    assert_ne!(imported[0].id, 900);
    assert_eq!(imported[0].workflow_steps.len(), 1);
    assert!(imported[0].workflow_steps[0].completed);
    assert!(imported[0].completion_token.is_some());
}

#[tokio::test]
async fn test_import_rejects_malformed_json() {
    let (_dir, desk) = create_test_desk().await;
    let err = desk.import_jobs_json("[{\"job_number\": 1}]").await.unwrap_err();
    assert!(matches!(err, DeskError::Serialization { .. }));

    let jobs = desk.list_jobs(&ListJobs::default()).await.unwrap();
    assert!(jobs.is_empty());
}
