use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use voiceagent_stt::{AudioEncoding, AuthInfo};

/// Current time as an ISO-8601 string
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Uniform JSON envelope for every API reply
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful reply carrying `data`
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            timestamp: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_timestamp(mut self) -> Self {
        self.timestamp = Some(now_iso());
        self
    }
}

impl ApiResponse<()> {
    /// Failed reply
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
            timestamp: None,
        }
    }
}

/// GET /health reply
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub service: &'static str,
    pub version: &'static str,
}

/// GET /api/test payload
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub component: &'static str,
    pub status: &'static str,
    pub auth: AuthInfo,
    pub timestamp: String,
}

/// GET /api/supported-formats payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedFormats {
    pub encodings: Vec<AudioEncoding>,
    pub sample_rates: Vec<u32>,
    pub timestamp: String,
}

/// GET /api/supported-languages payload
#[derive(Debug, Serialize)]
pub struct SupportedLanguages {
    pub languages: Vec<String>,
    pub timestamp: String,
}

/// Sample rate given either as a JSON number or a numeric string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SampleRateField {
    Number(u64),
    Text(String),
}

impl SampleRateField {
    /// Numeric value, `None` when it does not fit a sample rate
    pub fn value(&self) -> Option<u32> {
        match self {
            SampleRateField::Number(n) => u32::try_from(*n).ok(),
            SampleRateField::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// POST /api/speech-to-text/stream body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamRequest {
    /// Base64 encoded audio
    pub audio_chunk: Option<String>,

    pub encoding: Option<String>,

    pub sample_rate_hertz: Option<SampleRateField>,
}
