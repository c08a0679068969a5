use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("Failed to fetch questions: {0}")]
    Upstream(String),

    /// Error reported by our own backend, already worded for display.
    #[error("{0}")]
    Proxy(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        StoreError::Upstream(error.to_string())
    }
}

impl From<url::ParseError> for StoreError {
    fn from(error: url::ParseError) -> Self {
        StoreError::Upstream(error.to_string())
    }
}
