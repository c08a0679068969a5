use anyhow::Result;
use clap::{Parser, Subcommand};
use reqwest::Client;
use tracing_subscriber::{EnvFilter, fmt};
use workflows::{QuestionGenerator, WorkflowsClient, load_workflows, models::GENERATION_WEBHOOK};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// n8n instance, e.g. https://n8n.example.com
    #[arg(long, env = "N8N_BASE_URL")]
    base_url: String,

    #[arg(long, env = "N8N_API_KEY", hide_env_values = true)]
    api_key: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List workflows
    List {
        /// Follow cursors until the last page
        #[arg(long)]
        all: bool,
    },

    /// Start question generation for a workflow
    Generate {
        workflow_id: String,

        #[arg(long, default_value = GENERATION_WEBHOOK)]
        webhook: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let http = Client::new();

    match args.command {
        Command::List { all } => {
            let client = WorkflowsClient::new(http, &args.base_url, &args.api_key)?;
            let listing = load_workflows(&client, all).await?;

            for workflow in listing.workflows() {
                println!("{}\t{}", workflow.id, workflow.name);
            }

            if let Some(cursor) = listing.next_cursor() {
                println!("\nMore workflows available (cursor {cursor}), rerun with --all");
            }
        }
        Command::Generate {
            workflow_id,
            webhook,
        } => {
            let generator = QuestionGenerator::with_webhook(http, &webhook);
            let started = generator
                .trigger(&args.api_key, &args.base_url, &workflow_id)
                .await?;

            println!("Question generation started for {}", started.workflow_id);
            println!("Results: {}", started.results_path());
        }
    }

    Ok(())
}
