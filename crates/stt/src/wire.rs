//! Google Cloud Speech-to-Text v1 REST payloads
//!
//! Only the fields this service sends or reads are modelled.

use serde::{Deserialize, Serialize};

use crate::types::AudioEncoding;

/// `speech:recognize` request body
#[derive(Debug, Clone, Serialize)]
pub struct RecognizeRequest {
    pub config: RecognitionConfig,
    pub audio: RecognitionAudio,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionConfig {
    pub encoding: AudioEncoding,
    pub sample_rate_hertz: u32,
    pub language_code: String,
    pub enable_word_time_offsets: bool,
    pub enable_automatic_punctuation: bool,
    pub model: String,
    pub use_enhanced: bool,
}

/// Inline audio content, base64 encoded
#[derive(Debug, Clone, Serialize)]
pub struct RecognitionAudio {
    pub content: String,
}

/// `speech:recognize` response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecognizeResponse {
    #[serde(default)]
    pub results: Vec<SpeechRecognitionResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRecognitionResult {
    #[serde(default)]
    pub alternatives: Vec<SpeechRecognitionAlternative>,
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeechRecognitionAlternative {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub words: Vec<WordInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordInfo {
    /// Duration string such as "1.300s"
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub confidence: f32,
}

/// Error body returned by Google APIs
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorStatus {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}
