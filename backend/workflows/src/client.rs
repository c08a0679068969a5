use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    error::WorkflowsError,
    models::{API_KEY_HEADER, WorkflowPage},
    utils::{normalize_base_url, require_api_key, workflows_url},
};

#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<WorkflowPage, WorkflowsError>;
}

/// Talks to one n8n instance's public API.
#[derive(Clone)]
pub struct WorkflowsClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl WorkflowsClient {
    pub fn new(http: Client, base_url: &str, api_key: &str) -> Result<Self, WorkflowsError> {
        let api_key = require_api_key(api_key)?.to_string();
        let base_url = normalize_base_url(base_url)?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for WorkflowsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowsClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl PageSource for WorkflowsClient {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<WorkflowPage, WorkflowsError> {
        let url = workflows_url(&self.base_url, cursor)?;
        debug!(%url, "Fetching workflows page");

        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WorkflowsError::from_status(status));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};

    use super::*;
    use crate::models::Workflow;

    #[tokio::test]
    async fn test_fetch_first_page() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/workflows/")
            .match_header(API_KEY_HEADER, "n8n-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":[{"id":"1","name":"Onboarding"}],"nextCursor":"c2"}"#)
            .create_async()
            .await;

        let client = WorkflowsClient::new(Client::new(), &format!("{}//", server.url()), "n8n-key")
            .unwrap();
        let page = client.fetch_page(None).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            page.data,
            vec![Workflow {
                id: "1".to_string(),
                name: "Onboarding".to_string()
            }]
        );
        assert_eq!(page.next_cursor.as_deref(), Some("c2"));
    }

    #[tokio::test]
    async fn test_fetch_with_cursor() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/workflows/")
            .match_query(Matcher::UrlEncoded("cursor".into(), "c2".into()))
            .with_status(200)
            .with_body(r#"{"data":[],"nextCursor":null}"#)
            .create_async()
            .await;

        let client = WorkflowsClient::new(Client::new(), &server.url(), "n8n-key").unwrap();
        let page = client.fetch_page(Some("c2")).await.unwrap();

        mock.assert_async().await;
        assert!(page.data.is_empty());
        assert_eq!(page.next_cursor, None);
    }

    #[tokio::test]
    async fn test_upstream_status() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v1/workflows/")
            .with_status(401)
            .with_body(r#"{"message":"unauthorized"}"#)
            .create_async()
            .await;

        let client = WorkflowsClient::new(Client::new(), &server.url(), "wrong").unwrap();
        let error = client.fetch_page(None).await.unwrap_err();

        assert!(matches!(
            error,
            WorkflowsError::UpstreamStatus { status: 401, .. }
        ));
        assert_eq!(error.to_string(), "HTTP 401: Unauthorized");
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(matches!(
            WorkflowsClient::new(Client::new(), "https://x.com", ""),
            Err(WorkflowsError::MissingParameter(_))
        ));
        assert!(matches!(
            WorkflowsClient::new(Client::new(), "ftp://x.com", "key"),
            Err(WorkflowsError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = WorkflowsClient::new(Client::new(), "https://x.com", "secret").unwrap();

        assert!(!format!("{client:?}").contains("secret"));
    }
}
