use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkflowsError {
    #[error("{0} is required")]
    MissingParameter(&'static str),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {status}: {reason}")]
    UpstreamStatus { status: u16, reason: String },

    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("No more workflows to load")]
    NoMorePages,

    #[error("Question generation already in progress for workflow {0}")]
    GenerationInFlight(String),
}

impl WorkflowsError {
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        WorkflowsError::UpstreamStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown error").to_string(),
        }
    }
}

impl From<reqwest::Error> for WorkflowsError {
    fn from(error: reqwest::Error) -> Self {
        WorkflowsError::Upstream(error.to_string())
    }
}

impl From<url::ParseError> for WorkflowsError {
    fn from(error: url::ParseError) -> Self {
        WorkflowsError::InvalidUrl(error.to_string())
    }
}
