use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sample rate used when the caller does not provide one
pub const DEFAULT_SAMPLE_RATE: u32 = 16000;

/// Language used when the caller does not provide one
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Sample rates accepted by the service, in documented order
pub const SUPPORTED_SAMPLE_RATES: [u32; 5] = [8000, 12000, 16000, 24000, 48000];

/// Audio encodings accepted by the speech provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioEncoding {
    Linear16,
    Flac,
    Mp3,
    Mulaw,
    Amr,
    AmrWb,
    OggOpus,
    SpeexWithHeaderByte,
    WebmOpus,
}

impl AudioEncoding {
    /// All supported encodings, in documented order
    pub const ALL: [AudioEncoding; 9] = [
        AudioEncoding::Linear16,
        AudioEncoding::Flac,
        AudioEncoding::Mp3,
        AudioEncoding::Mulaw,
        AudioEncoding::Amr,
        AudioEncoding::AmrWb,
        AudioEncoding::OggOpus,
        AudioEncoding::SpeexWithHeaderByte,
        AudioEncoding::WebmOpus,
    ];

    /// Provider wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioEncoding::Linear16 => "LINEAR16",
            AudioEncoding::Flac => "FLAC",
            AudioEncoding::Mp3 => "MP3",
            AudioEncoding::Mulaw => "MULAW",
            AudioEncoding::Amr => "AMR",
            AudioEncoding::AmrWb => "AMR_WB",
            AudioEncoding::OggOpus => "OGG_OPUS",
            AudioEncoding::SpeexWithHeaderByte => "SPEEX_WITH_HEADER_BYTE",
            AudioEncoding::WebmOpus => "WEBM_OPUS",
        }
    }
}

impl fmt::Display for AudioEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoding name outside the supported set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported audio encoding: {0}")]
pub struct UnsupportedEncoding(pub String);

impl FromStr for AudioEncoding {
    type Err = UnsupportedEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| UnsupportedEncoding(s.to_string()))
    }
}

/// Check whether a sample rate belongs to the supported set
pub fn is_supported_sample_rate(rate: u32) -> bool {
    SUPPORTED_SAMPLE_RATES.contains(&rate)
}

/// Check an encoding name and optional sample rate against the supported sets
pub fn validate_format(encoding: &str, sample_rate_hertz: Option<u32>) -> bool {
    if encoding.parse::<AudioEncoding>().is_err() {
        return false;
    }

    sample_rate_hertz.map_or(true, is_supported_sample_rate)
}

/// Single recognition call input
#[derive(Debug, Clone)]
pub struct RecognitionRequest {
    /// Raw audio bytes
    pub audio: Vec<u8>,

    /// Audio encoding
    pub encoding: Option<AudioEncoding>,

    /// Sample rate in Hz
    pub sample_rate_hertz: Option<u32>,

    /// BCP-47 language tag
    pub language_code: Option<String>,

    /// Request per-word timestamps
    pub enable_word_time_offsets: bool,

    /// Let the provider insert punctuation (on when unset)
    pub enable_automatic_punctuation: Option<bool>,
}

impl RecognitionRequest {
    /// Create a request for the given audio with defaults for everything else
    pub fn new(audio: Vec<u8>, encoding: AudioEncoding) -> Self {
        Self {
            audio,
            encoding: Some(encoding),
            sample_rate_hertz: None,
            language_code: None,
            enable_word_time_offsets: false,
            enable_automatic_punctuation: None,
        }
    }

    /// Set sample rate
    pub fn with_sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate_hertz = Some(rate);
        self
    }

    /// Set language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language_code = Some(language.into());
        self
    }

    /// Enable word timing
    pub fn with_word_time_offsets(mut self, enable: bool) -> Self {
        self.enable_word_time_offsets = enable;
        self
    }

    /// Set automatic punctuation
    pub fn with_automatic_punctuation(mut self, enable: bool) -> Self {
        self.enable_automatic_punctuation = Some(enable);
        self
    }
}

/// Timing entry for a single recognized word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordInfo {
    pub word: String,

    /// Offset from audio start, e.g. "1.300s"
    pub start_time: String,

    /// Offset from audio start, e.g. "1.700s"
    pub end_time: String,

    pub confidence: f32,
}

/// Normalized recognition result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    /// Top alternative transcript
    pub transcript: String,

    /// Provider confidence in [0, 1]
    pub confidence: f32,

    /// Word timings, in spoken order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<WordInfo>>,

    /// Resolved language code
    pub language_code: String,
}

/// Non-secret description of the active credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthInfo {
    pub project_id: String,
    pub has_service_account: bool,
    pub auth_method: String,
}
