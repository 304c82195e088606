//! Filter types for querying jobs.

use super::JobStatus;
use crate::{error::DeskError, params::ListJobs};

/// Filter options for listing jobs.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    /// Only jobs in this status
    pub status: Option<JobStatus>,

    /// Only jobs using this workflow type
    pub workflow_type: Option<String>,

    /// Only jobs assigned to this technician
    pub tech_id: Option<u64>,

    /// Include archived jobs when no explicit status is requested
    pub include_archived: bool,
}

impl TryFrom<&ListJobs> for JobFilter {
    type Error = DeskError;

    /// Convert ListJobs parameters to a JobFilter, validating the status.
    ///
    /// ```rust
    /// use opsdesk_core::{models::{JobFilter, JobStatus}, params::ListJobs};
    ///
    /// let params = ListJobs {
    ///     status: Some("qc".to_string()),
    ///     ..Default::default()
    /// };
    /// let filter = JobFilter::try_from(&params)?;
    /// assert_eq!(filter.status, Some(JobStatus::Qc));
    ///
    /// let bad = ListJobs {
    ///     status: Some("finished".to_string()),
    ///     ..Default::default()
    /// };
    /// assert!(JobFilter::try_from(&bad).is_err());
    /// # Ok::<(), opsdesk_core::DeskError>(())
    /// ```
    fn try_from(params: &ListJobs) -> Result<Self, Self::Error> {
        let status = params
            .status
            .as_deref()
            .map(|s| {
                s.parse::<JobStatus>()
                    .map_err(|reason| DeskError::invalid_input("status").with_reason(reason))
            })
            .transpose()?;

        Ok(Self {
            status,
            workflow_type: params.workflow_type.clone(),
            tech_id: params.tech_id,
            include_archived: params.include_archived,
        })
    }
}
