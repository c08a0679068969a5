use std::{env, fmt, fs::read_to_string, str::FromStr};

use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("development") {
            Environment::Development
        } else {
            Environment::Production
        }
    }

    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing {0} environment variable")]
    Missing(&'static str),

    #[error("Invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

pub struct Config {
    pub port: u16,
    pub supabase_url: String,
    pub service_role_key: String,
    pub environment: Environment,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(e) = dotenv::dotenv() {
            debug!("No .env file loaded: {e}");
        }

        Self::from_lookup(lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            port: try_load(&lookup, "PORT", "3001")?,
            supabase_url: required(&lookup, "SUPABASE_URL", &["VITE_SUPABASE_URL"])?,
            service_role_key: required(&lookup, "SUPABASE_SERVICE_ROLE_KEY", &[])?,
            environment: lookup("APP_ENV")
                .map(|name| Environment::from_name(&name))
                .unwrap_or_default(),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("supabase_url", &self.supabase_url)
            .field("service_role_key", &"<redacted>")
            .field("environment", &self.environment)
            .finish()
    }
}

/// Environment variable first, then a mounted secret of the same name.
fn lookup(key: &str) -> Option<String> {
    var(key).or_else(|_| read_secret(key)).ok()
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        debug!("Environment variable {key} not found");
    })
}

fn read_secret(secret_name: &str) -> Result<String, ()> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            debug!("Failed to read {secret_name} from file: {e}");
        })
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        })
}

fn required<F>(lookup: &F, key: &'static str, fallbacks: &[&str]) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    std::iter::once(key)
        .chain(fallbacks.iter().copied())
        .find_map(|name| lookup(name).filter(|value| !value.trim().is_empty()))
        .ok_or(ConfigError::Missing(key))
}
