use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use voiceagent_common::{AppConfig, Result, VoiceAgentError};

use crate::auth::AuthProvider;
use crate::client::{GoogleSpeechApi, SpeechApi};
use crate::types::{
    is_supported_sample_rate, AudioEncoding, AuthInfo, RecognitionRequest, RecognitionResult,
    WordInfo, DEFAULT_LANGUAGE, DEFAULT_SAMPLE_RATE, SUPPORTED_SAMPLE_RATES,
};
use crate::wire;

/// Curated language list.
///
/// Approximates what the provider accepts; it is not queried live.
pub const SUPPORTED_LANGUAGES: [&str; 10] = [
    "en-US", "en-GB", "es-ES", "fr-FR", "de-DE", "it-IT", "pt-BR", "ja-JP", "ko-KR", "zh-CN",
];

const RECOGNITION_MODEL: &str = "default";

/// Speech-to-text client
///
/// Every call is an independent, single request to the provider. Chunks sent
/// through [`TranscriptionClient::recognize_chunk`] share no session state.
#[derive(Clone)]
pub struct TranscriptionClient {
    auth: Arc<AuthProvider>,
    api: Arc<dyn SpeechApi>,
}

impl TranscriptionClient {
    pub fn new(auth: Arc<AuthProvider>, api: Arc<dyn SpeechApi>) -> Self {
        Self { auth, api }
    }

    /// Build the production client (Google REST API) from configuration
    pub fn from_config(config: &AppConfig, auth: Arc<AuthProvider>) -> Result<Self> {
        let api = GoogleSpeechApi::new(
            config.speech_endpoint.clone(),
            auth.project_id(),
            Duration::from_secs(config.speech_timeout_secs),
        )?;
        Ok(Self::new(auth, Arc::new(api)))
    }

    /// Transcribe a complete audio payload
    pub async fn recognize(&self, request: &RecognitionRequest) -> Result<RecognitionResult> {
        let encoding = Self::validate(&request.audio, request.encoding, request.sample_rate_hertz)?;

        let language_code = request
            .language_code
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        let payload = Self::build_payload(
            &request.audio,
            encoding,
            request.sample_rate_hertz.unwrap_or(DEFAULT_SAMPLE_RATE),
            language_code.clone(),
            request.enable_word_time_offsets,
            request.enable_automatic_punctuation.unwrap_or(true),
        );

        let response = self.call(&payload).await.map_err(|e| {
            error!("Error in speech recognition: {}", e);
            e
        })?;

        let Some(result) = response.results.into_iter().next() else {
            return Err(VoiceAgentError::recognition("No transcription results returned"));
        };

        let top = result.alternatives.into_iter().next().unwrap_or_default();

        let words = if request.enable_word_time_offsets && !top.words.is_empty() {
            Some(top.words.into_iter().map(Self::map_word).collect())
        } else {
            None
        };

        info!(
            "Recognition completed - Transcript length: {}, Confidence: {:.3}",
            top.transcript.len(),
            top.confidence
        );

        Ok(RecognitionResult {
            transcript: top.transcript,
            confidence: clamp_confidence(top.confidence),
            words,
            language_code,
        })
    }

    /// Transcribe one chunk and return only the text.
    ///
    /// Returns an empty string when the provider has nothing to report.
    pub async fn recognize_chunk(&self, audio: &[u8], encoding: Option<AudioEncoding>, sample_rate_hertz: Option<u32>) -> Result<String> {
        let sample_rate = sample_rate_hertz.unwrap_or(DEFAULT_SAMPLE_RATE);
        let encoding = Self::validate(audio, encoding, Some(sample_rate))?;

        let payload = Self::build_payload(
            audio,
            encoding,
            sample_rate,
            DEFAULT_LANGUAGE.to_string(),
            false,
            true,
        );

        let response = self.call(&payload).await.map_err(|e| {
            error!("Error in chunk recognition: {}", e);
            e
        })?;

        let transcript = response
            .results
            .into_iter()
            .next()
            .and_then(|r| r.alternatives.into_iter().next())
            .map(|a| a.transcript)
            .unwrap_or_default();

        debug!("Chunk recognized - Transcript length: {}", transcript.len());
        Ok(transcript)
    }

    /// Supported language tags
    pub fn list_supported_languages(&self) -> Vec<String> {
        SUPPORTED_LANGUAGES.iter().map(|l| l.to_string()).collect()
    }

    /// Supported encodings, in documented order
    pub fn supported_encodings(&self) -> Vec<AudioEncoding> {
        AudioEncoding::ALL.to_vec()
    }

    /// Supported sample rates, in documented order
    pub fn supported_sample_rates(&self) -> Vec<u32> {
        SUPPORTED_SAMPLE_RATES.to_vec()
    }

    /// Check an encoding name and optional sample rate
    pub fn validate_format(&self, encoding: &str, sample_rate_hertz: Option<u32>) -> bool {
        crate::types::validate_format(encoding, sample_rate_hertz)
    }

    /// Non-secret auth description
    pub fn auth_info(&self) -> AuthInfo {
        self.auth.auth_info()
    }

    /// Probe credentials and the language catalogue; never fails
    pub async fn test_connection(&self) -> bool {
        if !self.auth.test_auth().await {
            warn!("Speech API connection test failed: no access token");
            return false;
        }

        !self.list_supported_languages().is_empty()
    }

    async fn call(&self, payload: &wire::RecognizeRequest) -> Result<wire::RecognizeResponse> {
        let token = self.auth.get_access_token().await?;
        self.api.recognize(&token, payload).await
    }

    fn validate(audio: &[u8], encoding: Option<AudioEncoding>, sample_rate_hertz: Option<u32>) -> Result<AudioEncoding> {
        if audio.is_empty() {
            return Err(VoiceAgentError::validation("Audio data is required"));
        }

        let encoding = encoding.ok_or_else(|| VoiceAgentError::validation("Audio encoding is required"))?;

        if let Some(rate) = sample_rate_hertz {
            if !is_supported_sample_rate(rate) {
                return Err(VoiceAgentError::validation(format!("Unsupported sample rate: {}", rate)));
            }
        }

        Ok(encoding)
    }

    fn build_payload(
        audio: &[u8],
        encoding: AudioEncoding,
        sample_rate_hertz: u32,
        language_code: String,
        enable_word_time_offsets: bool,
        enable_automatic_punctuation: bool,
    ) -> wire::RecognizeRequest {
        wire::RecognizeRequest {
            config: wire::RecognitionConfig {
                encoding,
                sample_rate_hertz,
                language_code,
                enable_word_time_offsets,
                enable_automatic_punctuation,
                model: RECOGNITION_MODEL.to_string(),
                use_enhanced: true,
            },
            audio: wire::RecognitionAudio {
                content: BASE64.encode(audio),
            },
        }
    }

    fn map_word(word: wire::WordInfo) -> WordInfo {
        WordInfo {
            word: word.word,
            start_time: word.start_time.unwrap_or_else(|| "0s".to_string()),
            end_time: word.end_time.unwrap_or_else(|| "0s".to_string()),
            confidence: clamp_confidence(word.confidence),
        }
    }
}

fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthConfig, StaticTokenProvider};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays a canned response and records what was sent
    struct CannedSpeechApi {
        response: std::result::Result<wire::RecognizeResponse, String>,
        calls: Mutex<Vec<(String, wire::RecognizeRequest)>>,
    }

    impl CannedSpeechApi {
        fn returning(response: wire::RecognizeResponse) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(response),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Err(message.to_string()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn last_request(&self) -> wire::RecognizeRequest {
            self.calls.lock().unwrap().last().unwrap().1.clone()
        }
    }

    #[async_trait]
    impl SpeechApi for CannedSpeechApi {
        async fn recognize(&self, access_token: &str, request: &wire::RecognizeRequest) -> Result<wire::RecognizeResponse> {
            self.calls
                .lock()
                .unwrap()
                .push((access_token.to_string(), request.clone()));
            self.response
                .clone()
                .map_err(VoiceAgentError::transport)
        }
    }

    fn auth(token: Option<&str>) -> Arc<AuthProvider> {
        Arc::new(AuthProvider::with_token_provider(
            AuthConfig::new("demo-project", None),
            Arc::new(StaticTokenProvider {
                token: token.map(|t| t.to_string()),
            }),
        ))
    }

    fn hello_response() -> wire::RecognizeResponse {
        wire::RecognizeResponse {
            results: vec![wire::SpeechRecognitionResult {
                alternatives: vec![wire::SpeechRecognitionAlternative {
                    transcript: "hello world".to_string(),
                    confidence: 0.93,
                    words: vec![
                        wire::WordInfo {
                            start_time: None,
                            end_time: Some("0.400s".to_string()),
                            word: "hello".to_string(),
                            confidence: 0.9,
                        },
                        wire::WordInfo {
                            start_time: Some("0.400s".to_string()),
                            end_time: Some("0.900s".to_string()),
                            word: "world".to_string(),
                            confidence: 1.2,
                        },
                    ],
                }],
                language_code: None,
            }],
        }
    }

    #[tokio::test]
    async fn test_recognize_rejects_empty_audio() {
        let api = CannedSpeechApi::returning(hello_response());
        let client = TranscriptionClient::new(auth(Some("t")), api.clone());

        let request = RecognitionRequest::new(Vec::new(), AudioEncoding::Flac)
            .with_sample_rate(16000)
            .with_word_time_offsets(true);

        match client.recognize(&request).await {
            Err(VoiceAgentError::Validation(msg)) => assert_eq!(msg, "Audio data is required"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_recognize_rejects_missing_encoding() {
        let api = CannedSpeechApi::returning(hello_response());
        let client = TranscriptionClient::new(auth(Some("t")), api.clone());

        let mut request = RecognitionRequest::new(vec![1, 2, 3], AudioEncoding::Linear16);
        request.encoding = None;

        match client.recognize(&request).await {
            Err(VoiceAgentError::Validation(msg)) => assert_eq!(msg, "Audio encoding is required"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_recognize_rejects_unsupported_sample_rate() {
        let api = CannedSpeechApi::returning(hello_response());
        let client = TranscriptionClient::new(auth(Some("t")), api.clone());

        let request = RecognitionRequest::new(vec![1], AudioEncoding::Linear16).with_sample_rate(44100);
        assert!(matches!(
            client.recognize(&request).await,
            Err(VoiceAgentError::Validation(_))
        ));
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_recognize_builds_default_payload() {
        let api = CannedSpeechApi::returning(hello_response());
        let client = TranscriptionClient::new(auth(Some("ya29.abc")), api.clone());

        let request = RecognitionRequest::new(b"mock audio data".to_vec(), AudioEncoding::Linear16);
        let result = client.recognize(&request).await.unwrap();

        assert_eq!(result.transcript, "hello world");
        assert!((result.confidence - 0.93).abs() < f32::EPSILON);
        assert_eq!(result.language_code, "en-US");
        assert!(result.words.is_none());

        let (token, sent) = api.calls.lock().unwrap()[0].clone();
        assert_eq!(token, "ya29.abc");
        assert_eq!(sent.audio.content, "bW9jayBhdWRpbyBkYXRh");
        assert_eq!(sent.config.sample_rate_hertz, 16000);
        assert_eq!(sent.config.language_code, "en-US");
        assert!(sent.config.enable_automatic_punctuation);
        assert!(!sent.config.enable_word_time_offsets);
        assert_eq!(sent.config.model, "default");
    }

    #[tokio::test]
    async fn test_recognize_keeps_requested_language() {
        let mut response = hello_response();
        response.results[0].language_code = Some("en-gb".to_string());
        let api = CannedSpeechApi::returning(response);
        let client = TranscriptionClient::new(auth(Some("t")), api);

        let request = RecognitionRequest::new(vec![0; 32], AudioEncoding::Linear16).with_language("en-GB");
        let result = client.recognize(&request).await.unwrap();
        assert_eq!(result.language_code, "en-GB");
    }

    #[tokio::test]
    async fn test_recognize_maps_words_when_requested() {
        let api = CannedSpeechApi::returning(hello_response());
        let client = TranscriptionClient::new(auth(Some("t")), api.clone());

        let request = RecognitionRequest::new(vec![0; 32], AudioEncoding::Flac)
            .with_sample_rate(48000)
            .with_language("en-GB")
            .with_word_time_offsets(true)
            .with_automatic_punctuation(false);
        let result = client.recognize(&request).await.unwrap();

        let words = result.words.unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].word, "hello");
        assert_eq!(words[0].start_time, "0s");
        assert_eq!(words[1].start_time, "0.400s");
        assert_eq!(words[1].confidence, 1.0);
        assert_eq!(result.language_code, "en-GB");

        let sent = api.last_request();
        assert_eq!(sent.config.sample_rate_hertz, 48000);
        assert!(!sent.config.enable_automatic_punctuation);
        assert!(sent.config.enable_word_time_offsets);
    }

    #[tokio::test]
    async fn test_recognize_fails_on_zero_results() {
        let api = CannedSpeechApi::returning(wire::RecognizeResponse::default());
        let client = TranscriptionClient::new(auth(Some("t")), api);

        let request = RecognitionRequest::new(vec![1, 2], AudioEncoding::Linear16);
        match client.recognize(&request).await {
            Err(VoiceAgentError::Recognition(msg)) => assert_eq!(msg, "No transcription results returned"),
            other => panic!("Expected Recognition error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_recognize_without_token_never_calls_api() {
        let api = CannedSpeechApi::returning(hello_response());
        let client = TranscriptionClient::new(auth(None), api.clone());

        let request = RecognitionRequest::new(vec![1], AudioEncoding::Linear16);
        assert!(matches!(
            client.recognize(&request).await,
            Err(VoiceAgentError::Token(_))
        ));
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_recognize_chunk_empty_results_is_empty_string() {
        let api = CannedSpeechApi::returning(wire::RecognizeResponse::default());
        let client = TranscriptionClient::new(auth(Some("t")), api.clone());

        let transcript = client
            .recognize_chunk(b"mock audio data", Some(AudioEncoding::Linear16), None)
            .await
            .unwrap();
        assert_eq!(transcript, "");
        assert_eq!(api.call_count(), 1);
        assert_eq!(api.last_request().config.sample_rate_hertz, 16000);
    }

    #[tokio::test]
    async fn test_recognize_chunk_returns_transcript() {
        let api = CannedSpeechApi::returning(hello_response());
        let client = TranscriptionClient::new(auth(Some("t")), api);

        let transcript = client
            .recognize_chunk(&[7; 8], Some(AudioEncoding::OggOpus), Some(24000))
            .await
            .unwrap();
        assert_eq!(transcript, "hello world");
    }

    #[tokio::test]
    async fn test_recognize_chunk_validates_input() {
        let api = CannedSpeechApi::returning(hello_response());
        let client = TranscriptionClient::new(auth(Some("t")), api.clone());

        assert!(matches!(
            client.recognize_chunk(&[], Some(AudioEncoding::Linear16), None).await,
            Err(VoiceAgentError::Validation(_))
        ));
        assert!(matches!(
            client.recognize_chunk(&[1], None, None).await,
            Err(VoiceAgentError::Validation(_))
        ));
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let api = CannedSpeechApi::failing("connection reset");
        let client = TranscriptionClient::new(auth(Some("t")), api);

        let err = client
            .recognize_chunk(&[1], Some(AudioEncoding::Linear16), None)
            .await
            .unwrap_err();
        assert!(matches!(err, VoiceAgentError::Transport(ref m) if m == "connection reset"));
    }

    #[tokio::test]
    async fn test_connection_check() {
        let client = TranscriptionClient::new(auth(None), CannedSpeechApi::returning(hello_response()));
        assert!(!client.test_connection().await);

        let client = TranscriptionClient::new(auth(Some("t")), CannedSpeechApi::returning(hello_response()));
        assert!(client.test_connection().await);
    }

    #[test]
    fn test_catalogues() {
        let client = TranscriptionClient::new(auth(None), CannedSpeechApi::returning(hello_response()));
        assert_eq!(client.list_supported_languages().len(), 10);
        assert_eq!(client.list_supported_languages()[0], "en-US");
        assert_eq!(client.supported_encodings().len(), 9);
        assert_eq!(client.supported_sample_rates(), vec![8000, 12000, 16000, 24000, 48000]);
        assert!(client.validate_format("WEBM_OPUS", Some(48000)));
        assert!(!client.validate_format("AAC", None));
    }

    #[test]
    fn test_clamp_confidence() {
        assert_eq!(clamp_confidence(-0.5), 0.0);
        assert_eq!(clamp_confidence(1.5), 1.0);
        assert_eq!(clamp_confidence(f32::NAN), 0.0);
        assert_eq!(clamp_confidence(0.42), 0.42);
    }
}
