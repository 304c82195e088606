//! Checklist automation triggered by the technician completion form.
//!
//! When a technician reports a capture as completed, the first scan step and
//! the first upload step of the job's checklist are completed on their behalf.
//! Steps are selected by [`StepKind`], so the wording of step names can change
//! without breaking the rule.

use jiff::Timestamp;

use crate::{
    catalog::StepKind,
    models::CompletionStatus,
    progress::WorkflowStepProgress,
};

/// Note attached to steps completed by this rule.
pub const AUTO_COMPLETE_NOTE: &str = "Auto-completed via tech completion form";

/// Actor recorded when the job has no technician email.
pub const FALLBACK_ACTOR: &str = "Tech";

/// Step kinds completed by the rule, each matched at most once. Both may
/// land on the same legacy step.
const AUTOMATED_KINDS: [StepKind; 2] = [StepKind::ScanCompleted, StepKind::Upload];

/// What the rule changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutomationOutcome {
    /// Indices of the steps that were marked complete
    pub completed_indices: Vec<usize>,
}

impl AutomationOutcome {
    /// Whether the rule touched any step.
    pub fn is_empty(&self) -> bool {
        self.completed_indices.is_empty()
    }
}

/// Applies the completion-form rule to `steps` in place.
///
/// Does nothing unless `status` is [`CompletionStatus::Completed`]. An empty
/// checklist is left empty; no materialisation happens here.
pub fn apply_completion_rule(
    steps: &mut [WorkflowStepProgress],
    status: CompletionStatus,
    tech_email: Option<&str>,
    now: Timestamp,
) -> AutomationOutcome {
    let mut outcome = AutomationOutcome::default();
    if status != CompletionStatus::Completed || steps.is_empty() {
        return outcome;
    }

    let actor = tech_email.unwrap_or(FALLBACK_ACTOR);
    for kind in AUTOMATED_KINDS {
        if let Some(index) = steps.iter().position(|s| s.is_kind(kind)) {
            let step = &mut steps[index];
            step.mark_complete(actor, now);
            step.notes = AUTO_COMPLETE_NOTE.to_string();
            if !outcome.completed_indices.contains(&index) {
                outcome.completed_indices.push(index);
            }
        }
    }

    outcome
}
