//! Confirmation messages and notification lists.

use std::fmt;

use crate::events::JobEvent;

/// One-line confirmation of an operation that has no resource to show.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    pub fn success(message: String) -> Self {
        Self {
            message,
            success: true,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            message,
            success: false,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.success { "Success:" } else { "Error:" };
        writeln!(f, "{label} {}", self.message)
    }
}

/// The notifications an operation produced, with their recipient roles.
///
/// Renders nothing when there are none, so it can be appended to any result.
pub struct Notifications<'a>(pub &'a [JobEvent]);

impl fmt::Display for Notifications<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }

        writeln!(f, "## Notifications")?;
        writeln!(f)?;
        for event in self.0 {
            let recipients: Vec<&str> = event.recipients().iter().map(|r| r.label()).collect();
            writeln!(
                f,
                "- **{}** (to {}): {event}",
                event.title(),
                recipients.join(", ")
            )?;
        }
        Ok(())
    }
}
