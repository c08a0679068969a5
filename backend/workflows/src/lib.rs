//! # n8n Workflows
//!
//! Listing workflows from a user's n8n instance and kicking off question generation.
//!
//! ## Listing
//!
//! - User supplies the instance base URL and an API key
//! - Base URL is trimmed, trailing slashes dropped, and must be `http://` or `https://`
//! - `GET {base_url}/api/v1/workflows/` with the key in `X-N8N-API-KEY`
//! - n8n answers `{ data: [{ id, name }], nextCursor }`, a null cursor means last page
//! - First page replaces whatever was listed, "load more" appends
//!
//! ## Generation
//!
//! - `POST { apikey, workflow_id, base_url }` to the generation webhook
//! - Only the status matters, the body is ignored
//! - One generation at a time, others are rejected before any request goes out
//! - On success the questions page for that workflow is next
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub mod client;
pub mod error;
pub mod generation;
pub mod listing;
pub mod models;
pub mod utils;

pub use client::{PageSource, WorkflowsClient};
pub use error::WorkflowsError;
pub use generation::{GenerationGate, GenerationStarted, QuestionGenerator};
pub use listing::{ListingState, WorkflowListing};
pub use models::{Workflow, WorkflowPage};

/// Loads the first page, then keeps following cursors when `all` is set.
pub async fn load_workflows<S>(source: &S, all: bool) -> Result<WorkflowListing, WorkflowsError>
where
    S: PageSource + ?Sized,
{
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut listing = WorkflowListing::new();
    let mut pages = 1;

    pb.set_message("Fetching page 1");
    if let Err(e) = listing.submit(source).await {
        pb.abandon_with_message("Failed");
        return Err(e);
    }

    while all && listing.can_load_more() {
        pages += 1;
        pb.set_message(format!("Fetching page {pages}"));

        if let Err(e) = listing.load_more(source).await {
            pb.abandon_with_message("Failed");
            return Err(e);
        }
    }

    pb.finish_with_message(format!(
        "Done, {} workflows over {pages} pages",
        listing.workflows().len()
    ));

    Ok(listing)
}
