//! # Question Store
//!
//! Read access to the hosted `questions` table.
//!
//! Questions are produced by an external generation workflow and only ever
//! read here. Two trust tiers exist:
//!
//! - [`QuestionStore<Anon>`]: public anon key, safe to ship to a client, subject to
//!   row-level security
//! - [`QuestionStore<ServiceRole>`]: service-role key, bypasses row-level security,
//!   backend only
//!
//! Both, plus [`ProxyClient`] which goes through our own backend, implement
//! [`QuestionSource`].
//!
//! ## Query
//!
//! ```text
//! GET {supabase_url}/rest/v1/questions
//!     ?select=id,question,workflow_id,created_at
//!     &workflow_id=eq.{workflow_id}
//!     &order=created_at.desc.nullslast,id.desc
//! ```
use std::cmp::Ordering;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod error;
pub mod proxy;
pub mod remote;
pub mod timestamp;

pub use error::StoreError;
pub use proxy::ProxyClient;
pub use remote::{Anon, QuestionStore, ServiceRole};
pub use timestamp::Timestamp;

pub const QUESTIONS_TABLE: &str = "questions";
pub const QUESTION_COLUMNS: &str = "id,question,workflow_id,created_at";
pub const QUESTION_ORDER: &str = "created_at.desc.nullslast,id.desc";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub question: String,
    pub workflow_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Question {
    /// Newest first, then highest id. Missing timestamps sort last.
    pub fn newest_first(a: &Question, b: &Question) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    }
}

#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn get_questions(&self, workflow_id: &str) -> Result<Vec<Question>, StoreError>;
}

pub(crate) fn require_workflow_id(workflow_id: &str) -> Result<(), StoreError> {
    if workflow_id.is_empty() {
        return Err(StoreError::InvalidArgument("workflowId is required"));
    }

    Ok(())
}

pub(crate) fn trim_base(url: &str) -> &str {
    url.trim_end_matches('/')
}
