use thiserror::Error;

/// Failure of a single generate or evaluate call against a provider.
///
/// These never abort a pipeline run; the orchestrator folds them into
/// row-local sentinel cells.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("not configured")]
    NotConfigured,
    #[error("not implemented")]
    NotImplemented,
    #[error("api error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("unexpected response structure: {0}")]
    MalformedResponse(String),
}

impl ModelError {
    /// Rendering safe for report cells: upstream bodies and messages stay
    /// in the logs, only the status code crosses over.
    pub fn public_reason(&self) -> String {
        match self {
            ModelError::NotConfigured => "not configured".to_string(),
            ModelError::NotImplemented => "not implemented".to_string(),
            ModelError::Api { status, .. } => format!("API Error: {status}"),
            ModelError::Transport(_) => "API call failed".to_string(),
            ModelError::MalformedResponse(_) => "unexpected response structure".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("topics file is empty or contains no valid topics")]
    EmptyTopicList,
}

/// Failure against the spreadsheet/drive provider. Unlike [`ModelError`],
/// these abort the run and propagate to the caller.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("sink api error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl SinkError {
    /// Remote HTTP status carried by the failure, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            SinkError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
