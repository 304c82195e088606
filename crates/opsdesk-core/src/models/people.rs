//! Technicians and clients referenced by jobs.

use serde::{Deserialize, Serialize};

/// A field technician who captures sites.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct Technician {
    /// Unique identifier for the technician
    pub id: u64,

    /// Display name
    pub name: String,

    /// Contact email, recorded as the actor on automated step completions
    pub email: String,
}

/// A client ordering jobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Client {
    /// Unique identifier for the client
    pub id: u64,

    /// Company or contact name
    pub name: String,

    /// Workflow type applied to new jobs when none is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_workflow: Option<String>,
}
