use tracing::{info, warn};

use crate::{client::PageSource, error::WorkflowsError, models::Workflow};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListingState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored(String),
}

/// Workflows accumulated over one listing session.
///
/// `submit` starts over, `load_more` follows the cursor. Once errored the
/// listing stays errored until the next `submit`.
#[derive(Debug, Default)]
pub struct WorkflowListing {
    state: ListingState,
    workflows: Vec<Workflow>,
    next_cursor: Option<String>,
}

impl WorkflowListing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    pub fn workflows(&self) -> &[Workflow] {
        &self.workflows
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    pub fn can_load_more(&self) -> bool {
        self.state == ListingState::Loaded && self.next_cursor.is_some()
    }

    pub async fn submit<S>(&mut self, source: &S) -> Result<&[Workflow], WorkflowsError>
    where
        S: PageSource + ?Sized,
    {
        self.workflows.clear();
        self.next_cursor = None;
        self.state = ListingState::Loading;

        match source.fetch_page(None).await {
            Ok(page) => {
                info!(count = page.data.len(), "Loaded workflows");

                self.workflows = page.data;
                self.next_cursor = non_empty(page.next_cursor);
                self.state = ListingState::Loaded;

                Ok(&self.workflows)
            }
            Err(e) => {
                warn!("Failed to fetch workflows: {e}");

                self.state = ListingState::Errored(e.to_string());
                Err(e)
            }
        }
    }

    /// Appends the next page. Returns how many workflows were added.
    pub async fn load_more<S>(&mut self, source: &S) -> Result<usize, WorkflowsError>
    where
        S: PageSource + ?Sized,
    {
        let cursor = match (&self.state, &self.next_cursor) {
            (ListingState::Loaded, Some(cursor)) => cursor.clone(),
            _ => return Err(WorkflowsError::NoMorePages),
        };

        self.state = ListingState::Loading;

        match source.fetch_page(Some(&cursor)).await {
            Ok(page) => {
                let added = page.data.len();
                info!(added, total = self.workflows.len() + added, "Loaded more workflows");

                self.workflows.extend(page.data);
                self.next_cursor = non_empty(page.next_cursor);
                self.state = ListingState::Loaded;

                Ok(added)
            }
            Err(e) => {
                warn!("Failed to load more workflows: {e}");

                self.state = ListingState::Errored(e.to_string());
                Err(e)
            }
        }
    }
}

/// n8n may send `""` on the last page, same as no cursor.
fn non_empty(cursor: Option<String>) -> Option<String> {
    cursor.filter(|cursor| !cursor.is_empty())
}
