use crate::error::VoiceAgentError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Voice agent application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Google Cloud project identifier
    pub project_id: Option<String>,

    /// Service account key file (GOOGLE_APPLICATION_CREDENTIALS)
    pub credentials_path: Option<PathBuf>,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,

    /// Directory served as static files when present
    pub static_dir: PathBuf,

    /// Speech API base URL
    pub speech_endpoint: String,

    /// Upper bound for a single provider call, in seconds
    pub speech_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            credentials_path: None,
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            log_dir: PathBuf::from("./logs"),
            log_level: "info".to_string(),
            static_dir: PathBuf::from("./public"),
            speech_endpoint: "https://speech.googleapis.com".to_string(),
            speech_timeout_secs: 60,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, VoiceAgentError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let config = Self::from_lookup(|key| std::env::var(key).ok());
        config.ensure_directories()?;

        Ok(config)
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let credentials_path = non_empty("GOOGLE_APPLICATION_CREDENTIALS").map(PathBuf::from);
        let project_id = non_empty("GOOGLE_PROJECT_ID").or_else(|| {
            credentials_path
                .as_deref()
                .and_then(Self::project_id_from_credentials)
        });

        Self {
            project_id,
            credentials_path,
            server_host: non_empty("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: non_empty("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.server_port),
            log_dir: non_empty("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_level: non_empty("LOG_LEVEL").unwrap_or(defaults.log_level),
            static_dir: non_empty("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            speech_endpoint: non_empty("SPEECH_API_ENDPOINT")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.speech_endpoint),
            speech_timeout_secs: non_empty("SPEECH_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.speech_timeout_secs),
        }
    }

    /// Read `project_id` out of a credential JSON file
    fn project_id_from_credentials(path: &Path) -> Option<String> {
        let content = std::fs::read_to_string(path).ok()?;
        let json: serde_json::Value = serde_json::from_str(&content).ok()?;
        json.get("project_id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    /// Ensure required directories exist, create if not
    pub fn ensure_directories(&self) -> Result<(), VoiceAgentError> {
        if !self.log_dir.exists() {
            std::fs::create_dir_all(&self.log_dir).map_err(|e| {
                VoiceAgentError::config(format!(
                    "Failed to create directory {}: {}",
                    self.log_dir.display(),
                    e
                ))
            })?;
        }

        Ok(())
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), VoiceAgentError> {
        if !self.speech_endpoint.starts_with("http://")
            && !self.speech_endpoint.starts_with("https://") {
            return Err(VoiceAgentError::config(
                "Speech API endpoint must start with http:// or https://"
            ));
        }

        if self.server_port == 0 {
            return Err(VoiceAgentError::config("Server port cannot be 0"));
        }

        if self.speech_timeout_secs == 0 {
            return Err(VoiceAgentError::config("Speech timeout cannot be 0"));
        }

        Ok(())
    }
}
