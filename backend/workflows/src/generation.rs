use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::Client;
use tracing::{info, warn};
use url::form_urlencoded;

use crate::{
    error::WorkflowsError,
    models::{GENERATION_WEBHOOK, GenerationRequest},
    utils::{normalize_base_url, require_api_key},
};

/// Allows a single generation request at a time.
#[derive(Debug, Clone, Default)]
pub struct GenerationGate {
    in_flight: Arc<Mutex<Option<String>>>,
}

/// Releases the gate on drop.
#[derive(Debug)]
pub struct GenerationGuard {
    in_flight: Arc<Mutex<Option<String>>>,
}

impl GenerationGate {
    pub fn begin(&self, workflow_id: &str) -> Result<GenerationGuard, WorkflowsError> {
        let mut in_flight = lock(&self.in_flight);

        if let Some(pending) = in_flight.as_ref() {
            return Err(WorkflowsError::GenerationInFlight(pending.clone()));
        }

        *in_flight = Some(workflow_id.to_string());

        Ok(GenerationGuard {
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    pub fn in_flight(&self) -> Option<String> {
        lock(&self.in_flight).clone()
    }
}

impl Drop for GenerationGuard {
    fn drop(&mut self) {
        *lock(&self.in_flight) = None;
    }
}

fn lock(in_flight: &Mutex<Option<String>>) -> MutexGuard<'_, Option<String>> {
    in_flight.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationStarted {
    pub workflow_id: String,
}

impl GenerationStarted {
    /// Where the generated questions for this workflow are shown.
    pub fn results_path(&self) -> String {
        let encoded: String =
            form_urlencoded::byte_serialize(self.workflow_id.as_bytes()).collect();

        format!("/questions?workflowId={encoded}")
    }
}

#[derive(Debug, Clone)]
pub struct QuestionGenerator {
    http: Client,
    webhook_url: String,
    gate: GenerationGate,
}

impl QuestionGenerator {
    pub fn new(http: Client) -> Self {
        Self::with_webhook(http, GENERATION_WEBHOOK)
    }

    pub fn with_webhook(http: Client, webhook_url: &str) -> Self {
        Self {
            http,
            webhook_url: webhook_url.to_string(),
            gate: GenerationGate::default(),
        }
    }

    pub fn gate(&self) -> &GenerationGate {
        &self.gate
    }

    pub fn is_generating(&self) -> bool {
        self.gate.in_flight().is_some()
    }

    pub async fn trigger(
        &self,
        api_key: &str,
        base_url: &str,
        workflow_id: &str,
    ) -> Result<GenerationStarted, WorkflowsError> {
        let api_key = require_api_key(api_key)?;
        let base_url = normalize_base_url(base_url)?;
        if workflow_id.is_empty() {
            return Err(WorkflowsError::MissingParameter("workflow_id"));
        }

        let _guard = self.gate.begin(workflow_id)?;
        info!(workflow_id, "Starting question generation");

        let response = self
            .http
            .post(&self.webhook_url)
            .json(&GenerationRequest {
                apikey: api_key,
                workflow_id,
                base_url: &base_url,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(workflow_id, %status, "Question generation rejected");
            return Err(WorkflowsError::from_status(status));
        }

        Ok(GenerationStarted {
            workflow_id: workflow_id.to_string(),
        })
    }
}
