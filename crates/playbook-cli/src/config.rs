//! CLI configuration.
//!
//! Defaults are overridden by environment variables; a `.env` file in the
//! working directory is honored.

use serde::{Deserialize, Serialize};

/// Backend used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Default proxy listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Application-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chat backend base URL.
    pub backend_url: String,
    /// Proxy listen port.
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Load configuration from the environment.
    pub fn load() -> Self {
        // Load .env if present (silently ignore if missing)
        let _ = dotenvy::dotenv();

        let mut config = Self::default();
        if let Ok(url) = std::env::var("PLAYBOOK_BACKEND_URL") {
            if !url.is_empty() {
                config.backend_url = url;
            }
        }
        if let Ok(port) = std::env::var("PLAYBOOK_PORT") {
            config.port = port.parse().unwrap_or(DEFAULT_PORT);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = Config::default();
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.port, DEFAULT_PORT);
    }
}
