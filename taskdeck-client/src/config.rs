/// Configuration for the Taskdeck client
///
/// This module loads client configuration from environment variables and
/// provides a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_BASE_URL`: base URL of the API, including the version prefix
///   (default: `http://localhost:3000/api/v1`)
/// - `API_TIMEOUT_SECS`: upper bound for every HTTP call (default: 30)
/// - `TASKDECK_STORAGE_DIR`: directory for persisted client state
///   (default: `.taskdeck`)
///
/// # Example
///
/// ```no_run
/// use taskdeck_client::config::ClientConfig;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = ClientConfig::from_env()?;
/// println!("Talking to {}", config.base_url);
/// # Ok(())
/// # }
/// ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the API, including the version prefix
    pub base_url: String,

    /// Upper bound for every HTTP call, in seconds
    pub timeout_secs: u64,

    /// Directory for persisted client state (session, UI preferences)
    pub storage_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api/v1".to_string(),
            timeout_secs: 30,
            storage_dir: PathBuf::from(".taskdeck"),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from environment variables
    ///
    /// Missing variables fall back to defaults; a malformed timeout is an
    /// error rather than a silent fallback.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let base_url = env::var("API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/api/v1".to_string());

        let timeout_secs = env::var("API_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()?;

        if timeout_secs == 0 {
            anyhow::bail!("API_TIMEOUT_SECS must be greater than zero");
        }

        let storage_dir = env::var("TASKDECK_STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".taskdeck"));

        Ok(Self { base_url, timeout_secs, storage_dir })
    }

    /// Creates a configuration pointing at the given base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    /// The request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Joins a request path onto the base URL
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000/api/v1");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = ClientConfig::with_base_url("http://localhost:3000/api/v1/");
        assert_eq!(config.url("/boards"), "http://localhost:3000/api/v1/boards");
    }
}
