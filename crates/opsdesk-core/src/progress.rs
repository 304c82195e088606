//! Per-job workflow progress.
//!
//! A job's checklist is a snapshot of its catalog template taken when the
//! workflow type is chosen: step names are copied, not linked, so later catalog
//! edits never rewrite history. All functions here are pure; persisting a
//! materialised checklist is always an explicit decision of the caller (see
//! [`crate::desk::Desk::commit_workflow`]).

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{self, StepKind, WorkflowStepTemplate},
    models::Job,
};

/// Completion state of one step on one job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkflowStepProgress {
    /// Step name copied from the template at instantiation time
    pub step_name: String,

    /// Kind copied from the template; absent on steps saved before kinds
    /// existed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<StepKind>,

    /// Whether the step is done
    #[serde(default)]
    pub completed: bool,

    /// When the step was completed
    #[serde(default)]
    pub completed_at: Option<Timestamp>,

    /// Free-text actor who completed the step, usually an email
    #[serde(default)]
    pub completed_by: Option<String>,

    /// Operator notes
    #[serde(default)]
    pub notes: String,
}

impl WorkflowStepProgress {
    /// A fresh, incomplete step for a template entry.
    pub fn from_template(step: &WorkflowStepTemplate) -> Self {
        Self {
            step_name: step.name.to_string(),
            kind: Some(step.kind),
            completed: false,
            completed_at: None,
            completed_by: None,
            notes: String::new(),
        }
    }

    /// The tagged kind, or one inferred from the name for legacy steps.
    pub fn effective_kind(&self) -> StepKind {
        self.kind
            .unwrap_or_else(|| StepKind::classify(&self.step_name))
    }

    /// Whether automation should treat the step as `kind`. A tagged step has
    /// exactly its tag; a legacy step is tested by name for each kind
    /// separately.
    pub fn is_kind(&self, kind: StepKind) -> bool {
        match self.kind {
            Some(tagged) => tagged == kind,
            None => kind.matches_name(&self.step_name),
        }
    }

    /// Marks the step complete by `actor` at `at`.
    pub fn mark_complete(&mut self, actor: &str, at: Timestamp) {
        self.completed = true;
        self.completed_at = Some(at);
        self.completed_by = Some(actor.to_string());
    }

    /// Marks the step incomplete, clearing who and when.
    pub fn clear(&mut self) {
        self.completed = false;
        self.completed_at = None;
        self.completed_by = None;
    }
}

/// Completed and total step counts for a checklist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ProgressCounts {
    pub completed: u32,
    pub total: u32,
}

impl ProgressCounts {
    /// Counts the steps of a checklist.
    pub fn of(steps: &[WorkflowStepProgress]) -> Self {
        Self {
            completed: steps.iter().filter(|s| s.completed).count() as u32,
            total: steps.len() as u32,
        }
    }

    /// `round(100 * completed / total)`, or 0 for an empty checklist.
    /// Halves round up.
    pub fn percentage(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let completed = u64::from(self.completed);
        let total = u64::from(self.total);
        ((200 * completed + total) / (2 * total)) as u8
    }
}

/// Rounded completion percentage of a checklist.
///
/// ```rust
/// use opsdesk_core::progress::{generate_steps, percentage};
///
/// let mut steps = generate_steps("outsourced-scan-upload-client");
/// assert_eq!(percentage(&steps), 0);
/// steps[0].completed = true;
/// assert_eq!(percentage(&steps), 33);
/// assert_eq!(percentage(&[]), 0);
/// ```
pub fn percentage(steps: &[WorkflowStepProgress]) -> u8 {
    ProgressCounts::of(steps).percentage()
}

/// A fresh, all-incomplete checklist for a workflow type. Empty for unknown
/// types.
pub fn generate_steps(workflow_type: &str) -> Vec<WorkflowStepProgress> {
    catalog::get_steps(workflow_type)
        .iter()
        .map(WorkflowStepProgress::from_template)
        .collect()
}

/// The checklist to show for a job.
///
/// Persisted steps always win. A job that names a known workflow but has no
/// steps gets a generated checklist. Nothing is written.
pub fn materialize(job: &Job) -> Vec<WorkflowStepProgress> {
    if !job.workflow_steps.is_empty() {
        return job.workflow_steps.clone();
    }
    job.workflow_type
        .as_deref()
        .map(generate_steps)
        .unwrap_or_default()
}

/// Switches a job to `new_type`, replacing its checklist with a fresh one.
///
/// Any existing progress is discarded; nothing is carried across templates.
/// `None` clears both the type and the checklist.
pub fn set_workflow_type(job: &mut Job, new_type: Option<&str>) {
    job.workflow_type = new_type.map(String::from);
    job.workflow_steps = new_type.map(generate_steps).unwrap_or_default();
}

/// Flips the step at `index`, stamping it with `completed_by` and the current
/// time when it becomes complete.
///
/// # Panics
///
/// Panics if `index` is out of range. Callers holding untrusted input must
/// bounds-check first.
pub fn toggle_step(steps: &mut [WorkflowStepProgress], index: usize, completed_by: &str) {
    toggle_step_at(steps, index, completed_by, Timestamp::now());
}

/// [`toggle_step`] with an explicit completion time.
///
/// # Panics
///
/// Panics if `index` is out of range.
pub fn toggle_step_at(
    steps: &mut [WorkflowStepProgress],
    index: usize,
    completed_by: &str,
    now: Timestamp,
) {
    let len = steps.len();
    let Some(step) = steps.get_mut(index) else {
        panic!("step index {index} out of range for checklist of {len} steps");
    };

    if step.completed {
        step.clear();
    } else {
        step.mark_complete(completed_by, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobStatus;

    fn job_with(workflow_type: Option<&str>, steps: Vec<WorkflowStepProgress>) -> Job {
        Job {
            id: 1,
            job_number: "J-1".to_string(),
            model_name: "Test Model".to_string(),
            client_id: None,
            tech: None,
            status: JobStatus::Scheduled,
            completion_status: None,
            incompletion_reason: None,
            incompletion_notes: None,
            tech_feedback: None,
            scanned_date: None,
            target_date: None,
            capture_address: None,
            city: None,
            state: None,
            workflow_type: workflow_type.map(String::from),
            workflow_steps: steps,
            completion_token: None,
            completion_form_submitted: false,
            created_at: Timestamp::from_second(1_767_225_600).unwrap(),
            updated_at: Timestamp::from_second(1_767_225_600).unwrap(),
        }
    }

    fn named(name: &str) -> WorkflowStepProgress {
        WorkflowStepProgress {
            step_name: name.to_string(),
            kind: None,
            completed: false,
            completed_at: None,
            completed_by: None,
            notes: String::new(),
        }
    }

    #[test]
    fn test_materialize_generates_hosted_checklist() {
        let job = job_with(Some("direct-scan-hosted"), vec![]);
        let steps = materialize(&job);

        let names: Vec<&str> = steps.iter().map(|s| s.step_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Scan Completed",
                "Upload to Our Account",
                "Quality Check",
                "Confirm Square Footage",
                "Send Link to Customer",
                "Invoice Job",
                "Add Recurring Hosting Invoice",
            ]
        );
        assert!(steps.iter().all(|s| !s.completed
            && s.completed_at.is_none()
            && s.completed_by.is_none()
            && s.notes.is_empty()));
    }

    #[test]
    fn test_materialize_prefers_persisted_steps() {
        let mut persisted = vec![named("Custom Step")];
        persisted[0].completed = true;
        let job = job_with(Some("direct-scan-hosted"), persisted.clone());

        let first = materialize(&job);
        let second = materialize(&job);
        assert_eq!(first, persisted);
        assert_eq!(first, second);
    }

    #[test]
    fn test_materialize_without_workflow_is_empty() {
        assert!(materialize(&job_with(None, vec![])).is_empty());
        assert!(materialize(&job_with(Some("gone"), vec![])).is_empty());
    }

    #[test]
    fn test_set_workflow_type_discards_progress() {
        let mut job = job_with(Some("direct-scan-hosted"), generate_steps("direct-scan-hosted"));
        toggle_step(&mut job.workflow_steps, 0, "ops@example.com");

        set_workflow_type(&mut job, Some("direct-scan-floorplan-photos"));

        assert_eq!(job.workflow_type.as_deref(), Some("direct-scan-floorplan-photos"));
        assert_eq!(job.workflow_steps.len(), 13);
        assert!(job.workflow_steps.iter().all(|s| !s.completed));
    }

    #[test]
    fn test_set_workflow_type_same_type_still_resets() {
        let mut job = job_with(Some("direct-scan-transfer"), generate_steps("direct-scan-transfer"));
        toggle_step(&mut job.workflow_steps, 2, "ops@example.com");

        set_workflow_type(&mut job, Some("direct-scan-transfer"));
        assert_eq!(percentage(&job.workflow_steps), 0);
    }

    #[test]
    fn test_set_workflow_type_none_clears() {
        let mut job = job_with(Some("direct-scan-hosted"), generate_steps("direct-scan-hosted"));
        set_workflow_type(&mut job, None);
        assert!(job.workflow_type.is_none());
        assert!(job.workflow_steps.is_empty());
    }

    #[test]
    fn test_toggle_round_trip_leaves_other_steps_alone() {
        let mut steps = generate_steps("outsourced-scan-transfer");
        let before = steps.clone();
        let at = Timestamp::from_second(1_767_312_000).unwrap();

        toggle_step_at(&mut steps, 1, "ops@example.com", at);
        assert!(steps[1].completed);
        assert_eq!(steps[1].completed_at, Some(at));
        assert_eq!(steps[1].completed_by.as_deref(), Some("ops@example.com"));
        assert_eq!(steps[0], before[0]);
        assert_eq!(steps[2], before[2]);
        assert_eq!(steps[3], before[3]);

        toggle_step_at(&mut steps, 1, "someone-else@example.com", at);
        assert!(!steps[1].completed);
        assert!(steps[1].completed_at.is_none());
        assert!(steps[1].completed_by.is_none());
        assert_eq!(steps, before);
    }

    #[test]
    fn test_toggle_keeps_notes() {
        let mut steps = vec![named("Quality Check")];
        steps[0].notes = "Check stairwell".to_string();
        toggle_step(&mut steps, 0, "qc@example.com");
        toggle_step(&mut steps, 0, "qc@example.com");
        assert_eq!(steps[0].notes, "Check stairwell");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_toggle_out_of_range_panics() {
        let mut steps = generate_steps("outsourced-scan-upload-client");
        toggle_step(&mut steps, 3, "ops@example.com");
    }

    #[test]
    fn test_percentage_rounding() {
        let mut steps = generate_steps("direct-scan-floorplan-photos");
        for (k, expected) in [(0, 0), (1, 8), (2, 15), (6, 46), (7, 54), (13, 100)] {
            for (i, step) in steps.iter_mut().enumerate() {
                step.completed = i < k;
            }
            assert_eq!(percentage(&steps), expected, "{k} of 13");
        }

        // 1 of 8 is exactly 12.5 and rounds up.
        let counts = ProgressCounts { completed: 1, total: 8 };
        assert_eq!(counts.percentage(), 13);
        assert_eq!(ProgressCounts::default().percentage(), 0);
    }

    #[test]
    fn test_effective_kind_falls_back_to_name() {
        let legacy = named("Upload to Client Account");
        assert_eq!(legacy.effective_kind(), StepKind::Upload);

        let mut tagged = named("Upload to Client Account");
        tagged.kind = Some(StepKind::Other);
        assert_eq!(tagged.effective_kind(), StepKind::Other);
    }

    #[test]
    fn test_is_kind_tests_legacy_names_per_kind() {
        let legacy = named("Scan Completed and Uploaded");
        assert!(legacy.is_kind(StepKind::ScanCompleted));
        assert!(legacy.is_kind(StepKind::Upload));
        assert!(!legacy.is_kind(StepKind::Other));

        let mut tagged = named("Scan Completed and Uploaded");
        tagged.kind = Some(StepKind::ScanCompleted);
        assert!(!tagged.is_kind(StepKind::Upload));
    }

    #[test]
    fn test_step_progress_deserializes_legacy_shape() {
        let step: WorkflowStepProgress =
            serde_json::from_str(r#"{"step_name": "Scan Completed", "completed": false}"#).unwrap();
        assert_eq!(step.kind, None);
        assert_eq!(step.effective_kind(), StepKind::ScanCompleted);
        assert!(step.notes.is_empty());
    }
}
