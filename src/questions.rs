//! # Questions Page
//!
//! Questions generated for one workflow, newest first, with a client-side search box.
use store::{Question, QuestionSource};
use tracing::warn;

pub const MISSING_WORKFLOW_ID: &str = "Missing workflowId parameter";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded,
    Errored(String),
}

#[derive(Debug, Default)]
pub struct QuestionsView {
    workflow_id: Option<String>,
    questions: Vec<Question>,
    state: LoadState,
}

impl QuestionsView {
    /// Loads the questions for `workflow_id`, as taken from the page's query string.
    pub async fn load<S>(source: &S, workflow_id: Option<&str>) -> Self
    where
        S: QuestionSource + ?Sized,
    {
        let Some(workflow_id) = workflow_id.filter(|id| !id.is_empty()) else {
            return Self {
                state: LoadState::Errored(MISSING_WORKFLOW_ID.to_string()),
                ..Self::default()
            };
        };

        let (questions, state) = match source.get_questions(workflow_id).await {
            Ok(questions) => (questions, LoadState::Loaded),
            Err(e) => {
                warn!(workflow_id, "Failed to load questions: {e}");
                (Vec::new(), LoadState::Errored(e.to_string()))
            }
        };

        Self {
            workflow_id: Some(workflow_id.to_string()),
            questions,
            state,
        }
    }

    pub fn workflow_id(&self) -> Option<&str> {
        self.workflow_id.as_deref()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Case-insensitive match on the question text. A blank query keeps everything.
    pub fn filtered(&self, query: &str) -> Vec<&Question> {
        let query = query.trim().to_lowercase();

        self.questions
            .iter()
            .filter(|q| query.is_empty() || q.question.to_lowercase().contains(&query))
            .collect()
    }
}
