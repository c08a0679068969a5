//! # Puff Backend
//!
//! Small proxy sitting between the web client and the services it can't (or shouldn't)
//! call directly.
//!
//! # Routes
//!
//! - `GET /health`: liveness, `{ "status": "ok" }`
//! - `GET /api/questions?workflowId=`: questions for a workflow, read with the service-role key
//! - `POST /api/n8n/workflows`: `{ baseUrl, apiKey, cursor? }`, forwarded to the user's n8n
//!   instance
//!
//! # Service Role Key
//!
//! The Supabase service-role key bypasses row-level security, so it only ever lives here.
//! The client either reads with the anon key under row-level security, or goes through this proxy.
//!
//! # Errors
//!
//! - 400 `{ error }` for a missing/invalid parameter
//! - n8n's own status with `{ error }` when n8n refuses
//! - 500 `{ error, message? }` otherwise, `message` is only filled in when `APP_ENV=development`
//!
//!
//!
//! # Setup
//!
//! ```sh
//! SUPABASE_URL=https://<project>.supabase.co \
//! SUPABASE_SERVICE_ROLE_KEY=... \
//! APP_ENV=development \
//! RUST_LOG=info \
//! cargo run -p puff-backend
//! ```
//!
//! The service-role key may also be mounted as `/run/secrets/SUPABASE_SERVICE_ROLE_KEY`.
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use config::Config;
use routes::{fallback_handler, health_handler, questions_handler, workflows_proxy_handler};
use state::AppState;

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;
    info!(environment = ?config.environment, "Config loaded");

    info!("Initializing state...");
    let state = AppState::new(config);

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    let app = router(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/questions", get(questions_handler))
        .route("/api/n8n/workflows", post(workflows_proxy_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
