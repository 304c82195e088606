//! The fixed catalog of workflow templates.
//!
//! Each template is an ordered checklist of steps for one kind of scanning
//! engagement. Template ids are stored on jobs as their workflow type, so they
//! must never change once released. The catalog is compiled into the binary
//! and is never mutated at runtime.
//!
//! # Examples
//!
//! ```rust
//! use opsdesk_core::catalog::{self, StepKind};
//!
//! let template = catalog::get_template("direct-scan-hosted").expect("known id");
//! assert_eq!(template.steps.len(), 7);
//! assert_eq!(template.steps[0].kind, StepKind::ScanCompleted);
//!
//! // Unknown ids are not an error, they just have no steps.
//! assert!(catalog::get_steps("no-such-workflow").is_empty());
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Roles that take part in a job's lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Field technician performing the capture
    Tech,
    /// Operations manager running QC and delivery
    OpsManager,
    /// Post-production and QC team
    PostProducer,
    /// Sales and invoicing
    SalesAdmin,
    /// Administrators; never assigned to template steps
    SuperAdmin,
}

impl Role {
    /// Wire representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tech => "tech",
            Role::OpsManager => "ops-manager",
            Role::PostProducer => "post-producer",
            Role::SalesAdmin => "sales-admin",
            Role::SuperAdmin => "super-admin",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Tech => "tech",
            Role::OpsManager => "ops manager",
            Role::PostProducer => "post producer",
            Role::SalesAdmin => "sales admin",
            Role::SuperAdmin => "super admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tech" => Ok(Role::Tech),
            "ops-manager" => Ok(Role::OpsManager),
            "post-producer" => Ok(Role::PostProducer),
            "sales-admin" => Ok(Role::SalesAdmin),
            "super-admin" => Ok(Role::SuperAdmin),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable classification of a step, used to drive automation
/// instead of matching on display names.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    /// The on-site capture itself
    ScanCompleted,
    /// Uploading captured data somewhere
    Upload,
    /// Anything else
    #[default]
    Other,
}

impl StepKind {
    /// Classify a step by its display name.
    ///
    /// Only used for persisted steps that predate the kind tag. Matching is
    /// case-insensitive and substring based.
    ///
    /// ```rust
    /// use opsdesk_core::catalog::StepKind;
    ///
    /// assert_eq!(StepKind::classify("Scan Completed"), StepKind::ScanCompleted);
    /// assert_eq!(StepKind::classify("Upload Images to Drive"), StepKind::Upload);
    /// assert_eq!(StepKind::classify("Request Floor Plan"), StepKind::Other);
    /// ```
    pub fn classify(name: &str) -> Self {
        let folded = name.to_lowercase();
        if folded.contains("scan completed") || folded.contains("scan complete") {
            StepKind::ScanCompleted
        } else if folded.contains("upload") {
            StepKind::Upload
        } else {
            StepKind::Other
        }
    }

    /// Whether a legacy step name satisfies this kind's name test.
    ///
    /// Unlike [`classify`](Self::classify), each kind is tested on its own,
    /// so "Scan Completed and Uploaded" matches both `ScanCompleted` and
    /// `Upload`.
    ///
    /// ```rust
    /// use opsdesk_core::catalog::StepKind;
    ///
    /// assert!(StepKind::ScanCompleted.matches_name("Scan Completed and Uploaded"));
    /// assert!(StepKind::Upload.matches_name("Scan Completed and Uploaded"));
    /// assert!(!StepKind::Upload.matches_name("Quality Check"));
    /// ```
    pub fn matches_name(&self, name: &str) -> bool {
        let folded = name.to_lowercase();
        match self {
            StepKind::ScanCompleted => {
                folded.contains("scan completed") || folded.contains("scan complete")
            }
            StepKind::Upload => folded.contains("upload"),
            StepKind::Other => {
                !StepKind::ScanCompleted.matches_name(name) && !StepKind::Upload.matches_name(name)
            }
        }
    }

    /// Database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::ScanCompleted => "scan-completed",
            StepKind::Upload => "upload",
            StepKind::Other => "other",
        }
    }
}

impl FromStr for StepKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scan-completed" => Ok(StepKind::ScanCompleted),
            "upload" => Ok(StepKind::Upload),
            "other" => Ok(StepKind::Other),
            _ => Err(format!("Invalid step kind: {s}")),
        }
    }
}

/// One step of a workflow template.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct WorkflowStepTemplate {
    /// Display name, copied into job progress at instantiation
    pub name: &'static str,
    /// What the step involves
    pub description: &'static str,
    /// Role responsible for the step
    pub assigned_role: Option<Role>,
    /// Classification used by automation
    pub kind: StepKind,
}

/// A named, ordered checklist for one workflow type.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct WorkflowTemplate {
    /// Stable key, stored on jobs as their workflow type
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Short summary of the engagement
    pub description: &'static str,
    /// Steps in display and completion order
    pub steps: &'static [WorkflowStepTemplate],
}

const fn step(
    name: &'static str,
    description: &'static str,
    role: Role,
    kind: StepKind,
) -> WorkflowStepTemplate {
    WorkflowStepTemplate {
        name,
        description,
        assigned_role: Some(role),
        kind,
    }
}

const SCAN_COMPLETED: WorkflowStepTemplate = step(
    "Scan Completed",
    "Tech completes the Matterport scan on-site",
    Role::Tech,
    StepKind::ScanCompleted,
);
const UPLOAD_TO_OUR_ACCOUNT: WorkflowStepTemplate = step(
    "Upload to Our Account",
    "Tech uploads scan to our Matterport account",
    Role::Tech,
    StepKind::Upload,
);
const QUALITY_CHECK: WorkflowStepTemplate = step(
    "Quality Check",
    "Review scan quality, accuracy, and coverage",
    Role::OpsManager,
    StepKind::Other,
);
const CONFIRM_SQUARE_FOOTAGE: WorkflowStepTemplate = step(
    "Confirm Square Footage",
    "Verify and update square footage from scan",
    Role::OpsManager,
    StepKind::Other,
);
const SEND_LINK_TO_CUSTOMER: WorkflowStepTemplate = step(
    "Send Link to Customer",
    "Email Matterport link to customer",
    Role::OpsManager,
    StepKind::Other,
);
const INVOICE_JOB: WorkflowStepTemplate = step(
    "Invoice Job",
    "Create and send invoice to customer",
    Role::SalesAdmin,
    StepKind::Other,
);
const ADD_RECURRING_HOSTING_INVOICE: WorkflowStepTemplate = step(
    "Add Recurring Hosting Invoice",
    "Set up $50/year hosting invoice (after first year)",
    Role::SalesAdmin,
    StepKind::Other,
);
const REQUEST_FLOOR_PLAN: WorkflowStepTemplate = step(
    "Request Floor Plan",
    "Send model link to floor plan supplier",
    Role::OpsManager,
    StepKind::Other,
);
const RECEIVE_FLOOR_PLAN: WorkflowStepTemplate = step(
    "Receive Floor Plan",
    "Receive completed floor plan from supplier",
    Role::OpsManager,
    StepKind::Other,
);
const SEND_FLOOR_PLAN_TO_CUSTOMER: WorkflowStepTemplate = step(
    "Send Floor Plan to Customer",
    "Email floor plan to customer",
    Role::OpsManager,
    StepKind::Other,
);

/// Every workflow template, in display order.
pub static TEMPLATES: &[WorkflowTemplate] = &[
    WorkflowTemplate {
        id: "outsourced-scan-upload-client",
        name: "Outsourced: Scan & Upload to Client",
        description: "Matterport 3D Scan only and upload to client account",
        steps: &[
            SCAN_COMPLETED,
            step(
                "Upload to Client Account",
                "Tech uploads scan directly to client's Matterport account",
                Role::Tech,
                StepKind::Upload,
            ),
            step(
                "Confirm Upload",
                "Verify upload completed successfully",
                Role::OpsManager,
                StepKind::Other,
            ),
        ],
    },
    WorkflowTemplate {
        id: "outsourced-scan-transfer",
        name: "Outsourced: Scan & Transfer",
        description: "Scan, upload to our account, then transfer to client",
        steps: &[
            SCAN_COMPLETED,
            UPLOAD_TO_OUR_ACCOUNT,
            step(
                "Model Processing",
                "Wait for Matterport model to finish processing",
                Role::OpsManager,
                StepKind::Other,
            ),
            step(
                "Transfer to Client",
                "Transfer processed model to client's email/account",
                Role::OpsManager,
                StepKind::Other,
            ),
        ],
    },
    WorkflowTemplate {
        id: "outsourced-scan-survey-images",
        name: "Outsourced: Scan, Survey & Images",
        description: "Scan, fill survey form, and upload images",
        steps: &[
            SCAN_COMPLETED,
            step(
                "Upload Scan",
                "Upload scan to designated account",
                Role::Tech,
                StepKind::Upload,
            ),
            step(
                "Complete Survey Form",
                "Tech fills out client's survey form",
                Role::Tech,
                StepKind::Other,
            ),
            step(
                "Upload Images",
                "Tech uploads photos to client's link",
                Role::Tech,
                StepKind::Upload,
            ),
            step(
                "Verify Completion",
                "Confirm all deliverables submitted",
                Role::OpsManager,
                StepKind::Other,
            ),
        ],
    },
    WorkflowTemplate {
        id: "direct-scan-hosted",
        name: "Direct: Scan Hosted by Us",
        description: "Scan, QC, confirm sqft, send link, invoice, add hosting",
        steps: &[
            SCAN_COMPLETED,
            UPLOAD_TO_OUR_ACCOUNT,
            QUALITY_CHECK,
            CONFIRM_SQUARE_FOOTAGE,
            SEND_LINK_TO_CUSTOMER,
            INVOICE_JOB,
            ADD_RECURRING_HOSTING_INVOICE,
        ],
    },
    WorkflowTemplate {
        id: "direct-scan-transfer",
        name: "Direct: Scan & Transfer",
        description: "Scan, QC, confirm sqft, transfer to customer, invoice",
        steps: &[
            SCAN_COMPLETED,
            UPLOAD_TO_OUR_ACCOUNT,
            QUALITY_CHECK,
            CONFIRM_SQUARE_FOOTAGE,
            step(
                "Transfer to Customer",
                "Transfer model to customer's email/account",
                Role::OpsManager,
                StepKind::Other,
            ),
            INVOICE_JOB,
        ],
    },
    WorkflowTemplate {
        id: "direct-scan-floorplan",
        name: "Direct: Scan + Floor Plan",
        description: "Scan hosted by us with floor plan from supplier",
        steps: &[
            SCAN_COMPLETED,
            UPLOAD_TO_OUR_ACCOUNT,
            QUALITY_CHECK,
            REQUEST_FLOOR_PLAN,
            SEND_LINK_TO_CUSTOMER,
            RECEIVE_FLOOR_PLAN,
            SEND_FLOOR_PLAN_TO_CUSTOMER,
            INVOICE_JOB,
            ADD_RECURRING_HOSTING_INVOICE,
        ],
    },
    WorkflowTemplate {
        id: "direct-scan-floorplan-photos",
        name: "Direct: Scan + Floor Plan + Photos",
        description: "Scan hosted with floor plan and photo extraction",
        steps: &[
            SCAN_COMPLETED,
            UPLOAD_TO_OUR_ACCOUNT,
            QUALITY_CHECK,
            step(
                "Post-Processing",
                "Edit Matterport model and extract images",
                Role::PostProducer,
                StepKind::Other,
            ),
            REQUEST_FLOOR_PLAN,
            SEND_LINK_TO_CUSTOMER,
            RECEIVE_FLOOR_PLAN,
            SEND_FLOOR_PLAN_TO_CUSTOMER,
            step(
                "Upload Images to Drive",
                "Upload extracted images to Google Drive folder",
                Role::PostProducer,
                StepKind::Upload,
            ),
            step(
                "Send Images Link to Customer",
                "Email Drive folder link to customer",
                Role::OpsManager,
                StepKind::Other,
            ),
            CONFIRM_SQUARE_FOOTAGE,
            INVOICE_JOB,
            ADD_RECURRING_HOSTING_INVOICE,
        ],
    },
    WorkflowTemplate {
        id: "direct-scan-asbuilts",
        name: "Direct: Scan + As-Builts",
        description: "Scan hosted with as-built drawings in various formats",
        steps: &[
            SCAN_COMPLETED,
            UPLOAD_TO_OUR_ACCOUNT,
            QUALITY_CHECK,
            step(
                "Request As-Builts",
                "Send model link to as-built supplier with format specs",
                Role::OpsManager,
                StepKind::Other,
            ),
            CONFIRM_SQUARE_FOOTAGE,
            SEND_LINK_TO_CUSTOMER,
            INVOICE_JOB,
            step(
                "Receive As-Builts",
                "Receive completed as-built drawings from supplier",
                Role::OpsManager,
                StepKind::Other,
            ),
            step(
                "Send As-Builts to Customer",
                "Email as-built files to customer",
                Role::OpsManager,
                StepKind::Other,
            ),
            ADD_RECURRING_HOSTING_INVOICE,
        ],
    },
];

/// Looks up a template by workflow type.
pub fn get_template(workflow_type: &str) -> Option<&'static WorkflowTemplate> {
    TEMPLATES.iter().find(|t| t.id == workflow_type)
}

/// Steps for a workflow type, or an empty slice for unknown types.
pub fn get_steps(workflow_type: &str) -> &'static [WorkflowStepTemplate] {
    get_template(workflow_type).map_or(&[], |t| t.steps)
}

/// All templates in display order.
pub fn list_templates() -> &'static [WorkflowTemplate] {
    TEMPLATES
}

/// Whether the workflow type exists in the catalog.
pub fn is_known(workflow_type: &str) -> bool {
    get_template(workflow_type).is_some()
}
