//! Display implementations for domain models.
//!
//! Kept apart from the model definitions so the models stay plain data.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    catalog::{self, StepKind, WorkflowTemplate},
    desk::CompletionFormView,
    models::{
        Client, CompletionStatus, IncompletionReason, Job, JobStatus, JobSummary, TechRef,
        Technician,
    },
    progress::{self, ProgressCounts, WorkflowStepProgress},
};

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for IncompletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ProgressCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({}%)", self.completed, self.total, self.percentage())
    }
}

impl fmt::Display for WorkflowStepProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.completed { "[x]" } else { "[ ]" };
        write!(f, "{mark} {}", self.step_name)?;

        if self.completed {
            match (&self.completed_by, &self.completed_at) {
                (Some(by), Some(at)) => write!(f, " _(by {by}, {})_", LocalDateTime(at))?,
                (Some(by), None) => write!(f, " _(by {by})_")?,
                (None, Some(at)) => write!(f, " _({})_", LocalDateTime(at))?,
                (None, None) => {}
            }
        }

        if !self.notes.is_empty() {
            write!(f, ": {}", self.notes)?;
        }
        Ok(())
    }
}

impl fmt::Display for TechRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TechRef::Id(id) => write!(f, "technician #{id}"),
            TechRef::Expanded(tech) => write!(f, "{} <{}>", tech.name, tech.email),
        }
    }
}

impl Job {
    fn fmt_address(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.capture_address, &self.city, &self.state]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .filter(|p| !p.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}: {}", self.id, self.job_number, self.model_name)?;
        writeln!(f)?;

        writeln!(f, "- Status: {}", self.status)?;
        match &self.tech {
            Some(tech) => writeln!(f, "- Technician: {tech}")?,
            None => writeln!(f, "- Technician: unassigned")?,
        }
        if let Some(client_id) = self.client_id {
            writeln!(f, "- Client: #{client_id}")?;
        }
        if let Some(target) = self.target_date {
            writeln!(f, "- Target date: {target}")?;
        }
        if let Some(address) = self.fmt_address() {
            writeln!(f, "- Address: {address}")?;
        }
        if let Some(status) = self.completion_status {
            write!(f, "- Tech report: {status}")?;
            if let Some(reason) = self.incompletion_reason {
                write!(f, " ({reason})")?;
            }
            writeln!(f)?;
        }
        if let Some(scanned) = self.scanned_date {
            writeln!(f, "- Scanned: {scanned}")?;
        }
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if let Some(notes) = &self.incompletion_notes {
            writeln!(f)?;
            writeln!(f, "> {notes}")?;
        }
        if let Some(feedback) = &self.tech_feedback {
            writeln!(f)?;
            writeln!(f, "Tech feedback: {feedback}")?;
        }

        let Some(workflow_type) = &self.workflow_type else {
            return writeln!(f, "\nNo workflow selected.");
        };

        let steps = progress::materialize(self);
        let name = catalog::get_template(workflow_type).map_or("Unknown workflow", |t| t.name);
        writeln!(f)?;
        writeln!(
            f,
            "## {name} (`{workflow_type}`): {}",
            ProgressCounts::of(&steps)
        )?;
        writeln!(f)?;
        for (index, step) in steps.iter().enumerate() {
            writeln!(f, "- **{index}** {step}")?;
        }
        if self.workflow_steps.is_empty() && !steps.is_empty() {
            writeln!(f)?;
            writeln!(f, "_Checklist generated from the template and not saved yet._")?;
        }

        Ok(())
    }
}

impl fmt::Display for JobSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progress = if self.has_workflow() {
            format!(" [{}]", self.progress)
        } else {
            String::new()
        };

        writeln!(
            f,
            "## {}: {} (ID: {}){progress}",
            self.job_number, self.model_name, self.id
        )?;
        writeln!(f)?;

        write!(f, "- **Status**: {}", self.status)?;
        if let Some(report) = self.completion_status {
            write!(f, ", tech reported {report}")?;
        }
        writeln!(f)?;
        if let Some(tech) = &self.tech_name {
            writeln!(f, "- **Technician**: {tech}")?;
        }
        if let Some(target) = self.target_date {
            writeln!(f, "- **Target**: {target}")?;
        }
        if let Some(workflow_type) = &self.workflow_type {
            writeln!(f, "- **Workflow**: {workflow_type}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for WorkflowTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {} (`{}`)", self.name, self.id)?;
        writeln!(f)?;
        writeln!(f, "{}", self.description)?;
        writeln!(f)?;

        for (index, step) in self.steps.iter().enumerate() {
            write!(f, "{index}. **{}**", step.name)?;
            if let Some(role) = step.assigned_role {
                write!(f, " _({})_", role.label())?;
            }
            if step.kind != StepKind::Other {
                write!(f, " `{}`", step.kind)?;
            }
            writeln!(f, ": {}", step.description)?;
        }
        Ok(())
    }
}

impl fmt::Display for Technician {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> (ID: {})", self.name, self.email, self.id)
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ID: {})", self.name, self.id)?;
        if let Some(workflow) = &self.default_workflow {
            write!(f, ", default workflow `{workflow}`")?;
        }
        Ok(())
    }
}

impl fmt::Display for CompletionFormView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Completion form: {} {}", self.job_number, self.model_name)?;
        writeln!(f)?;
        if let Some(target) = self.target_date {
            writeln!(f, "- Target date: {target}")?;
        }
        let address: Vec<&str> = [&self.capture_address, &self.city, &self.state]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .collect();
        if !address.is_empty() {
            writeln!(f, "- Address: {}", address.join(", "))?;
        }
        writeln!(f)?;
        if self.already_submitted {
            writeln!(f, "This form has already been submitted.")
        } else {
            writeln!(f, "Awaiting the technician's report.")
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::{civil::date, Timestamp};

    use super::*;

    fn job() -> Job {
        Job {
            id: 3,
            job_number: "J-3".to_string(),
            model_name: "Harbor Loft".to_string(),
            client_id: None,
            tech: Some(TechRef::Expanded(Technician {
                id: 1,
                name: "Sam".to_string(),
                email: "sam@example.com".to_string(),
            })),
            status: JobStatus::Scheduled,
            completion_status: None,
            incompletion_reason: None,
            incompletion_notes: None,
            tech_feedback: None,
            scanned_date: None,
            target_date: Some(date(2026, 5, 4)),
            capture_address: Some("12 Pier Rd".to_string()),
            city: Some("Portland".to_string()),
            state: Some("ME".to_string()),
            workflow_type: Some("outsourced-scan-upload-client".to_string()),
            workflow_steps: vec![],
            completion_token: None,
            completion_form_submitted: false,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_job_display_shows_generated_checklist() {
        let output = job().to_string();
        assert!(output.contains("# 3. J-3: Harbor Loft"));
        assert!(output.contains("- Technician: Sam <sam@example.com>"));
        assert!(output.contains("- Address: 12 Pier Rd, Portland, ME"));
        assert!(output.contains("0/3 (0%)"));
        assert!(output.contains("- **0** [ ] Scan Completed"));
        assert!(output.contains("not saved yet"));
    }

    #[test]
    fn test_job_display_saved_checklist() {
        let mut job = job();
        job.workflow_steps = progress::generate_steps("outsourced-scan-upload-client");
        job.workflow_steps[0].completed = true;
        job.workflow_steps[0].completed_by = Some("Tech".to_string());

        let output = job.to_string();
        assert!(output.contains("1/3 (33%)"));
        assert!(output.contains("[x] Scan Completed _(by Tech)_"));
        assert!(!output.contains("not saved yet"));
    }

    #[test]
    fn test_job_display_without_workflow() {
        let mut job = job();
        job.workflow_type = None;
        job.tech = None;
        let output = job.to_string();
        assert!(output.contains("unassigned"));
        assert!(output.contains("No workflow selected."));
    }

    #[test]
    fn test_summary_display_includes_progress() {
        let summary = JobSummary::from(&job());
        let output = summary.to_string();
        assert!(output.contains("## J-3: Harbor Loft (ID: 3) [0/3 (0%)]"));
        assert!(output.contains("- **Technician**: Sam"));
    }

    #[test]
    fn test_template_display_lists_steps() {
        let template = catalog::get_template("outsourced-scan-transfer").unwrap();
        let output = template.to_string();
        assert!(output.starts_with("# Outsourced: Scan & Transfer (`outsourced-scan-transfer`)"));
        assert!(output.contains("0. **Scan Completed**"));
        assert!(output.contains("`scan-completed`"));
    }

    #[test]
    fn test_incompletion_reason_display() {
        assert_eq!(
            IncompletionReason::PocNoShow.to_string(),
            IncompletionReason::PocNoShow.describe()
        );
    }
}
