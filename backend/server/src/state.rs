use std::sync::Arc;

use reqwest::Client;
use store::{QuestionStore, ServiceRole};

use super::config::Config;

pub struct AppState {
    pub config: Config,
    pub store: QuestionStore<ServiceRole>,
    pub http: Client,
}

impl AppState {
    pub fn new(config: Config) -> Arc<Self> {
        let http = Client::new();
        let store = QuestionStore::service_role(
            http.clone(),
            &config.supabase_url,
            &config.service_role_key,
        );

        Arc::new(Self {
            config,
            store,
            http,
        })
    }
}
