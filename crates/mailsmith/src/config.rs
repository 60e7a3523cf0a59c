//! Transport configuration file.

use anyhow::{Context, Result};
use mailsmith_api::MailApiClient;
use mailsmith_smtp::SmtpConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "MAILSMITH_CONFIG";

/// Transports the binary can send through.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// SMTP server settings.
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
    /// HTTP mail API settings.
    #[serde(default)]
    pub api: Option<ApiConfig>,
}

/// HTTP mail API settings.
#[derive(Clone, Deserialize)]
pub struct ApiConfig {
    /// OAuth2 bearer token.
    pub access_token: String,
    /// Overrides the default send endpoint.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("access_token", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl ApiConfig {
    /// Builds a client for these settings.
    pub fn client(&self) -> Result<MailApiClient> {
        let client = MailApiClient::new(self.access_token.clone())?;
        match &self.endpoint {
            Some(endpoint) => client
                .with_endpoint(endpoint)
                .with_context(|| format!("invalid API endpoint {endpoint:?}")),
            None => Ok(client),
        }
    }
}

impl Config {
    /// Parses a config document.
    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("invalid config file")
    }

    /// Reads the config file, or returns an empty config if it does not exist.
    pub async fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            debug!("No config file at {}", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path).await
    }

    /// Reads the config file at `path`.
    pub async fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("in {}", path.display()))
    }

    /// Returns the SMTP section or explains where to add it.
    pub fn smtp(&self) -> Result<&SmtpConfig> {
        self.smtp
            .as_ref()
            .with_context(|| format!("no \"smtp\" section in {}", config_path().display()))
    }

    /// Returns the API section or explains where to add it.
    pub fn api(&self) -> Result<&ApiConfig> {
        self.api
            .as_ref()
            .with_context(|| format!("no \"api\" section in {}", config_path().display()))
    }
}

/// Location of the config file.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV).map_or_else(
        || {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("mailsmith")
                .join("config.json")
        },
        PathBuf::from,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mailsmith_smtp::Security;

    #[test]
    fn test_full_config() {
        let config = Config::from_json(
            r#"{
                "smtp": {
                    "host": "smtp.example.com",
                    "security": "starttls",
                    "username": "me",
                    "password": "hunter2"
                },
                "api": {"access_token": "ya29.x", "endpoint": "http://127.0.0.1:9/send"}
            }"#,
        )
        .unwrap();

        let smtp = config.smtp().unwrap();
        assert_eq!(smtp.host, "smtp.example.com");
        assert_eq!(smtp.security, Security::StartTls);
        assert_eq!(smtp.effective_port(), 587);
        assert_eq!(smtp.client_hostname, "localhost");

        let api = config.api().unwrap();
        assert_eq!(api.client().unwrap().endpoint().port(), Some(9));
        assert!(!format!("{api:?}").contains("ya29.x"));
    }

    #[test]
    fn test_missing_sections() {
        let config = Config::from_json("{}").unwrap();
        assert!(config.smtp().is_err());
        assert!(config.api().is_err());
    }

    #[test]
    fn test_bad_endpoint() {
        let config = Config::from_json(r#"{"api": {"access_token": "t", "endpoint": "nope"}}"#)
            .unwrap();
        assert!(config.api().unwrap().client().is_err());
    }

    #[tokio::test]
    async fn test_load_from_missing_file() {
        let err = Config::load_from(Path::new("/nonexistent/mailsmith/config.json"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
