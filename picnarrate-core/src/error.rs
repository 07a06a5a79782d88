use thiserror::Error;

pub const NO_FILE_SELECTED: &str = "no file selected";
pub const NOT_AN_IMAGE: &str = "selected file is not an image";

/// Errors surfaced to the user. Each one is terminal for the operation that raised it only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Precondition failed before any network call.
    #[error("validation error: {0}")]
    Validation(String),

    /// Connection failure, timeout or non-2xx status.
    #[error("transport error: {0}")]
    Transport(String),

    /// A response arrived but its root could not be interpreted.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ClientError {
    pub fn no_file() -> Self {
        ClientError::Validation(NO_FILE_SELECTED.to_string())
    }

    /// Short inline message for display next to the control that triggered the operation.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(msg) if msg == NO_FILE_SELECTED => {
                "Please select a file before uploading.".into()
            }
            ClientError::Validation(msg) if msg == NOT_AN_IMAGE => {
                "The selected file is not an image.".into()
            }
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Transport(msg) => msg.clone(),
            ClientError::MalformedResponse(_) => "Unexpected response structure.".into(),
        }
    }
}
