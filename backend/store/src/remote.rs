use std::{fmt, marker::PhantomData};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::{
    QUESTION_COLUMNS, QUESTION_ORDER, QUESTIONS_TABLE, Question, QuestionSource, StoreError,
    require_workflow_id, trim_base,
};

pub trait Tier: Send + Sync + 'static {
    const NAME: &'static str;
}

/// Public key tier. Reads are limited by row-level security.
pub struct Anon;

/// Elevated key tier. Never hand one of these to a client.
pub struct ServiceRole;

impl Tier for Anon {
    const NAME: &'static str = "anon";
}

impl Tier for ServiceRole {
    const NAME: &'static str = "service_role";
}

pub struct QuestionStore<T: Tier> {
    http: Client,
    base_url: String,
    key: String,
    tier: PhantomData<T>,
}

impl QuestionStore<Anon> {
    pub fn anon(http: Client, base_url: &str, anon_key: &str) -> Self {
        Self::with_key(http, base_url, anon_key)
    }
}

impl QuestionStore<ServiceRole> {
    pub fn service_role(http: Client, base_url: &str, service_role_key: &str) -> Self {
        Self::with_key(http, base_url, service_role_key)
    }
}

impl<T: Tier> QuestionStore<T> {
    fn with_key(http: Client, base_url: &str, key: &str) -> Self {
        Self {
            http,
            base_url: trim_base(base_url).to_string(),
            key: key.to_string(),
            tier: PhantomData,
        }
    }

    pub fn endpoint(&self, workflow_id: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("{}/rest/v1/{QUESTIONS_TABLE}", self.base_url))?;

        url.query_pairs_mut()
            .append_pair("select", QUESTION_COLUMNS)
            .append_pair("workflow_id", &format!("eq.{workflow_id}"))
            .append_pair("order", QUESTION_ORDER);

        Ok(url)
    }

    pub async fn get_questions(&self, workflow_id: &str) -> Result<Vec<Question>, StoreError> {
        require_workflow_id(workflow_id)?;

        let url = self.endpoint(workflow_id)?;
        debug!(tier = T::NAME, workflow_id, "Fetching questions");

        let response = self
            .http
            .get(url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::Upstream(error_message(response).await));
        }

        let mut questions: Vec<Question> = response.json().await?;

        let fetched = questions.len();
        questions.retain(|question| question.workflow_id == workflow_id);
        if questions.len() != fetched {
            warn!(
                workflow_id,
                dropped = fetched - questions.len(),
                "Store returned questions for another workflow"
            );
        }

        questions.sort_by(Question::newest_first);

        Ok(questions)
    }
}

impl<T: Tier> fmt::Debug for QuestionStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestionStore")
            .field("tier", &T::NAME)
            .field("base_url", &self.base_url)
            .field("key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl<T: Tier> QuestionSource for QuestionStore<T> {
    async fn get_questions(&self, workflow_id: &str) -> Result<Vec<Question>, StoreError> {
        QuestionStore::get_questions(self, workflow_id).await
    }
}

#[derive(Deserialize)]
struct PostgrestError {
    message: String,
}

async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    serde_json::from_str::<PostgrestError>(&body)
        .map(|error| error.message)
        .unwrap_or_else(|_| format!("HTTP {status}"))
}
