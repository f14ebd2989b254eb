// src/config.rs
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5555";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout: Duration,
    /// Where the session's key/value storage lives. `None` keeps it in memory.
    pub storage_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            storage_path: default_storage_path(),
        }
    }
}

impl ClientConfig {
    /// Reads `FLEET_API_URL`, `FLEET_HTTP_TIMEOUT_SECS` and `FLEET_STORAGE_PATH`,
    /// falling back to defaults for anything unset or unparsable. `.env` is
    /// loaded by `main` before this runs.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let api_url = var("FLEET_API_URL")
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or(defaults.api_url);
        let timeout = var("FLEET_HTTP_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        let storage_path = var("FLEET_STORAGE_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .or(defaults.storage_path);

        Self { api_url, timeout, storage_path }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn in_memory(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            storage_path: None,
        }
    }
}

fn default_storage_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("globetrans-fleet").join("storage.json"))
}
