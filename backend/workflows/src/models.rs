use serde::{Deserialize, Serialize};

pub const WORKFLOWS_PATH: &str = "/api/v1/workflows/";

pub const API_KEY_HEADER: &str = "X-N8N-API-KEY";

pub const GENERATION_WEBHOOK: &str =
    "https://primary-production-a0f8d.up.railway.app/webhook-test/create/questions";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowPage {
    pub data: Vec<Workflow>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerationRequest<'a> {
    pub apikey: &'a str,
    pub workflow_id: &'a str,
    pub base_url: &'a str,
}
