use std::env;

use reqwest::Client;
use store::{Anon, ProxyClient, QuestionStore};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing {0} environment variable")]
    Missing(&'static str),
}

/// Everything the client needs to reach Supabase and the backend.
#[derive(Clone)]
pub struct ClientConfig {
    pub supabase_url: String,
    pub anon_key: String,
    pub api_base_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenv::dotenv() {
            debug!("No .env file loaded: {e}");
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| lookup(key).filter(|value| !value.trim().is_empty()))
        };

        let supabase_url = first(&["SUPABASE_URL", "VITE_SUPABASE_URL"])
            .ok_or(ConfigError::Missing("SUPABASE_URL"))?;

        let anon_key = first(&["SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY"]).unwrap_or_else(|| {
            warn!("Missing SUPABASE_ANON_KEY, Supabase queries will fail");
            String::new()
        });

        let api_base_url = first(&["API_BASE_URL", "VITE_API_BASE_URL"])
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        Ok(Self {
            supabase_url,
            anon_key,
            api_base_url,
        })
    }

    pub fn question_store(&self, http: Client) -> QuestionStore<Anon> {
        QuestionStore::anon(http, &self.supabase_url, &self.anon_key)
    }

    pub fn proxy_client(&self, http: Client) -> ProxyClient {
        ProxyClient::new(http, &self.api_base_url)
    }
}
