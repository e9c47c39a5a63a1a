//! Centralized configuration management for sleepsurvey

use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Result, Context};

const DEFAULT_API_URL: &str = "http://localhost:3000/api/responses";
const DEFAULT_LOG_FILE: &str = "sleepsurvey.log";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Endpoint survey responses are posted to
    pub api_url: String,
    /// Log file written by the TUI and CLI commands
    pub log_file: PathBuf,
    /// HTTP client configuration
    pub http: HttpConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: "sleepsurvey/0.1.0".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            log_file: DEFAULT_LOG_FILE.into(),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let api_url = std::env::var("SURVEY_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let log_file = std::env::var("SURVEY_LOG_FILE")
            .unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string())
            .into();

        let http = HttpConfig {
            timeout_seconds: parse_env_var("SURVEY_HTTP_TIMEOUT_SECONDS")?.unwrap_or(30),
            user_agent: std::env::var("SURVEY_USER_AGENT")
                .unwrap_or_else(|_| "sleepsurvey/0.1.0".to_string()),
        };

        Ok(Config {
            api_url,
            log_file,
            http,
        })
    }

    /// Replace the endpoint when one was given on the command line
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        self
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Directory and file name for the log appender
    pub fn log_location(&self) -> (PathBuf, PathBuf) {
        let dir = self
            .log_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let file = self
            .log_file
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
        (dir, file)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.api_url)
            .with_context(|| format!("Invalid survey API URL: {}", self.api_url))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow::anyhow!(
                "Survey API URL must use http or https: {}",
                self.api_url
            ));
        }

        if self.http.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("HTTP timeout must be at least one second"));
        }

        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}
