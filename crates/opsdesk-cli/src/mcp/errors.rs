//! Error handling utilities for MCP server

use opsdesk_core::DeskError;
use rmcp::ErrorData;

/// Converts a desk error into an MCP error.
///
/// Failures caused by the request itself are reported as invalid parameters
/// so the client can correct them; storage failures are internal errors.
pub fn to_mcp_error(message: &str, error: &DeskError) -> ErrorData {
    let text = format!("{message}: {error}");
    match error {
        DeskError::JobNotFound { .. }
        | DeskError::TechnicianNotFound { .. }
        | DeskError::ClientNotFound { .. }
        | DeskError::TokenNotFound
        | DeskError::FormAlreadySubmitted
        | DeskError::UnknownWorkflowType { .. }
        | DeskError::InvalidInput { .. } => ErrorData::invalid_params(text, None),
        _ => ErrorData::internal_error(text, None),
    }
}
