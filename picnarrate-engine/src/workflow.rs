use picnarrate_core::error::ClientError;
use picnarrate_core::types::UploadResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

impl WorkflowStatus {
    /// A stable label for display; intentionally not derived from `Debug`.
    pub fn label(self) -> &'static str {
        match self {
            WorkflowStatus::Idle => "idle",
            WorkflowStatus::InFlight => "uploading",
            WorkflowStatus::Succeeded => "done",
            WorkflowStatus::Failed => "failed",
        }
    }
}

/// Transient state of the upload/describe/synthesize workflow.
///
/// `generation` identifies the submission that owns the state. Updates carrying an older
/// generation are dropped, so a superseded submission can never overwrite a newer one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadWorkflowState {
    pub status: WorkflowStatus,
    pub generation: u64,
    /// Percentage in `[0, 100]`; only meaningful while in flight.
    pub progress: u8,
    pub result: Option<UploadResult>,
    pub error: Option<ClientError>,
}

impl UploadWorkflowState {
    pub fn is_in_flight(&self) -> bool {
        self.status == WorkflowStatus::InFlight
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ClientError::user_message)
    }
}
