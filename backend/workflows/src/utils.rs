use url::Url;

use crate::{error::WorkflowsError, models::WORKFLOWS_PATH};

pub fn strip_trailing_slashes(url: &str) -> &str {
    url.trim_end_matches('/')
}

pub fn normalize_base_url(input: &str) -> Result<String, WorkflowsError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(WorkflowsError::InvalidUrl("base URL is empty".to_string()));
    }

    let normalized = strip_trailing_slashes(trimmed);
    if !normalized.starts_with("http://") && !normalized.starts_with("https://") {
        return Err(WorkflowsError::InvalidUrl(format!(
            "{normalized} must start with http:// or https://"
        )));
    }

    Ok(normalized.to_string())
}

pub fn require_api_key(api_key: &str) -> Result<&str, WorkflowsError> {
    if api_key.trim().is_empty() {
        return Err(WorkflowsError::MissingParameter("API key"));
    }

    Ok(api_key)
}

/// `{base_url}/api/v1/workflows/`, with the cursor as a query parameter when there is one.
pub fn workflows_url(base_url: &str, cursor: Option<&str>) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!(
        "{}{WORKFLOWS_PATH}",
        strip_trailing_slashes(base_url)
    ))?;

    if let Some(cursor) = cursor.filter(|cursor| !cursor.is_empty()) {
        url.query_pairs_mut().append_pair("cursor", cursor);
    }

    Ok(url)
}
