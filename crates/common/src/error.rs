/// Voice agent error types
#[derive(Debug, thiserror::Error)]
pub enum VoiceAgentError {
    /// Invalid caller input (missing audio, unsupported encoding or sample rate)
    #[error("{0}")]
    Validation(String),

    /// Credential resolution failed
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Access token could not be obtained
    #[error("Failed to get access token: {0}")]
    Token(String),

    /// Provider returned no usable result
    #[error("Speech recognition failed: {0}")]
    Recognition(String),

    /// Network failure contacting the provider
    #[error("Transport error: {0}")]
    Transport(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VoiceAgentError {
    /// Create validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Create authentication error
    pub fn authentication<S: Into<String>>(msg: S) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create token error
    pub fn token<S: Into<String>>(msg: S) -> Self {
        Self::Token(msg.into())
    }

    /// Create recognition error
    pub fn recognition<S: Into<String>>(msg: S) -> Self {
        Self::Recognition(msg.into())
    }

    /// Create transport error
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

// HTTP response conversion
impl VoiceAgentError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Recognition(_) => 422,
            Self::Authentication(_) => 502,
            Self::Token(_) => 502,
            Self::Transport(_) => 502,
            Self::Config(_) => 500,
            Self::Internal(_) => 500,
            Self::Io(_) => 500,
            Self::Json(_) => 500,
            Self::Other(_) => 500,
        }
    }

    /// Whether the message may be shown to the HTTP caller.
    ///
    /// Internal failures are only logged; the caller gets a generic message.
    pub fn is_client_visible(&self) -> bool {
        self.status_code() < 500 || matches!(
            self,
            Self::Authentication(_) | Self::Token(_) | Self::Transport(_)
        )
    }
}
