use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::{Question, QuestionSource, StoreError, require_workflow_id, trim_base};

/// Reads questions through the backend's `/api/questions` route, so the
/// elevated key stays on the server.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: Client,
    api_base_url: String,
}

#[derive(Deserialize)]
struct ProxyError {
    error: String,
    message: Option<String>,
}

impl ProxyClient {
    pub fn new(http: Client, api_base_url: &str) -> Self {
        Self {
            http,
            api_base_url: trim_base(api_base_url).to_string(),
        }
    }

    pub fn endpoint(&self, workflow_id: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("{}/api/questions", self.api_base_url))?;
        url.query_pairs_mut().append_pair("workflowId", workflow_id);

        Ok(url)
    }
}

#[async_trait]
impl QuestionSource for ProxyClient {
    async fn get_questions(&self, workflow_id: &str) -> Result<Vec<Question>, StoreError> {
        require_workflow_id(workflow_id)?;

        let url = self.endpoint(workflow_id)?;
        debug!(%url, "Fetching questions through proxy");

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = match response.json::<ProxyError>().await {
                Ok(ProxyError {
                    error,
                    message: Some(message),
                }) => format!("{error}: {message}"),
                Ok(ProxyError { error, .. }) => error,
                Err(_) => format!("HTTP {status}"),
            };

            return Err(StoreError::Proxy(message));
        }

        Ok(response.json().await?)
    }
}
