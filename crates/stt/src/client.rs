use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};
use voiceagent_common::{Result, VoiceAgentError};

use crate::wire::{ErrorResponse, RecognizeRequest, RecognizeResponse};

/// Remote speech recognition API
#[async_trait]
pub trait SpeechApi: Send + Sync {
    /// Send one synchronous recognition request
    async fn recognize(&self, access_token: &str, request: &RecognizeRequest) -> Result<RecognizeResponse>;
}

/// Google Cloud Speech-to-Text REST client
#[derive(Debug, Clone)]
pub struct GoogleSpeechApi {
    base_url: String,
    project_id: String,
    client: Client,
}

impl GoogleSpeechApi {
    /// Create new client
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. `https://speech.googleapis.com`
    /// * `project_id` - Project billed for the calls
    /// * `timeout` - Upper bound for a single call
    pub fn new(base_url: impl Into<String>, project_id: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VoiceAgentError::internal(format!("Failed to create HTTP client: {}", e)))?;

        info!("Speech API client initialized: {} (timeout {:?})", base_url, timeout);
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            client,
        })
    }

    fn recognize_url(&self) -> String {
        format!("{}/v1/speech:recognize", self.base_url)
    }

    /// Turn a non-success response into the matching error
    fn status_error(status: StatusCode, body: &str) -> VoiceAgentError {
        let detail = serde_json::from_str::<ErrorResponse>(body)
            .map(|e| e.error.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| body.trim().to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                VoiceAgentError::authentication(format!("Speech API rejected credentials ({}): {}", status, detail))
            }
            s if s.is_server_error() => {
                VoiceAgentError::transport(format!("Speech API unavailable ({}): {}", status, detail))
            }
            _ => VoiceAgentError::recognition(format!("Speech API error ({}): {}", status, detail)),
        }
    }
}

#[async_trait]
impl SpeechApi for GoogleSpeechApi {
    async fn recognize(&self, access_token: &str, request: &RecognizeRequest) -> Result<RecognizeResponse> {
        debug!(
            "Sending recognize request - Encoding: {}, Sample rate: {}, Language: {}, Audio bytes (base64): {}",
            request.config.encoding,
            request.config.sample_rate_hertz,
            request.config.language_code,
            request.audio.content.len()
        );

        let response = self
            .client
            .post(self.recognize_url())
            .bearer_auth(access_token)
            .header("x-goog-user-project", &self.project_id)
            .json(request)
            .send()
            .await
            .map_err(|e| VoiceAgentError::transport(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| VoiceAgentError::transport(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(Self::status_error(status, &body));
        }

        let result: RecognizeResponse = serde_json::from_str(&body)
            .map_err(|e| VoiceAgentError::recognition(format!("Failed to parse response: {}", e)))?;

        debug!("Received recognize response - Results: {}", result.results.len());
        Ok(result)
    }
}
