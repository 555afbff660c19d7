use std::sync::Arc;
use tracing::info;
use voiceagent_common::{AppConfig, Result};
use voiceagent_stt::{AuthConfig, AuthProvider, TranscriptionClient};

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Speech-to-text client
    pub speech: TranscriptionClient,
}

impl AppState {
    /// Create new application state
    pub fn new(config: AppConfig) -> Result<Self> {
        let auth_config = AuthConfig::from_app_config(&config)?;

        info!("Google Auth configuration:");
        info!("  Project ID: {}", auth_config.project_id);
        info!(
            "  Service account key: {}",
            if auth_config.credentials_path.is_some() { "configured" } else { "not configured" }
        );

        let auth = Arc::new(AuthProvider::new(auth_config));
        info!("  Authentication method: {}", auth.auth_info().auth_method);

        let speech = TranscriptionClient::from_config(&config, auth)?;

        Ok(Self { config, speech })
    }

    /// Create state around an existing client
    pub fn with_client(config: AppConfig, speech: TranscriptionClient) -> Self {
        Self { config, speech }
    }
}
