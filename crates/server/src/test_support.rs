//! Fakes for handler tests

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use voiceagent_common::{AppConfig, Result, VoiceAgentError};
use voiceagent_stt::wire::{self, RecognizeRequest, RecognizeResponse};
use voiceagent_stt::{AuthConfig, AuthProvider, SpeechApi, TokenProvider, TranscriptionClient};

use crate::state::AppState;

pub(crate) struct StaticTokens(Option<String>);

#[async_trait]
impl TokenProvider for StaticTokens {
    async fn get_token(&self) -> Result<String> {
        self.0
            .clone()
            .ok_or_else(|| VoiceAgentError::token("metadata server unreachable"))
    }
}

pub(crate) fn static_token() -> Arc<dyn TokenProvider> {
    Arc::new(StaticTokens(Some("test-token".to_string())))
}

pub(crate) fn no_token() -> Arc<dyn TokenProvider> {
    Arc::new(StaticTokens(None))
}

/// Speech API replaying one canned response
pub(crate) struct CannedSpeechApi {
    response: RecognizeResponse,
    calls: Mutex<Vec<RecognizeRequest>>,
}

impl CannedSpeechApi {
    /// Provider that recognizes nothing
    pub(crate) fn empty() -> Arc<Self> {
        Self::returning(RecognizeResponse::default())
    }

    /// Provider that always hears `transcript`
    pub(crate) fn hearing(transcript: &str) -> Arc<Self> {
        Self::returning(RecognizeResponse {
            results: vec![wire::SpeechRecognitionResult {
                alternatives: vec![wire::SpeechRecognitionAlternative {
                    transcript: transcript.to_string(),
                    confidence: 0.87,
                    words: vec![wire::WordInfo {
                        start_time: Some("0s".to_string()),
                        end_time: Some("0.500s".to_string()),
                        word: transcript.to_string(),
                        confidence: 0.87,
                    }],
                }],
                language_code: Some("en-us".to_string()),
            }],
        })
    }

    fn returning(response: RecognizeResponse) -> Arc<Self> {
        Arc::new(Self {
            response,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn calls(&self) -> Vec<RecognizeRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechApi for CannedSpeechApi {
    async fn recognize(&self, _access_token: &str, request: &RecognizeRequest) -> Result<RecognizeResponse> {
        self.calls.lock().unwrap().push(request.clone());
        Ok(self.response.clone())
    }
}

pub(crate) fn state(tokens: Arc<dyn TokenProvider>, api: Arc<CannedSpeechApi>) -> AppState {
    let auth = Arc::new(AuthProvider::with_token_provider(
        AuthConfig::new("test-project", None),
        tokens,
    ));
    AppState::with_client(AppConfig::default(), TranscriptionClient::new(auth, api))
}

/// Initialize the full application (middleware included) around fakes
macro_rules! init_app {
    ($tokens:expr, $api:expr) => {
        actix_web::test::init_service($crate::build_app(
            actix_web::web::Data::new(std::sync::Arc::new($crate::test_support::state($tokens, $api))),
            None,
        ))
        .await
    };
}

pub(crate) use init_app;
