//! Voice Agent STT (Speech-to-Text) client
//!
//! Google Cloud Speech-to-Text credentials, REST client and request mapping

pub mod auth;
pub mod client;
pub mod speech;
pub mod types;
pub mod wire;

// Re-export main types
pub use auth::{AuthConfig, AuthProvider, CredentialSource, GoogleTokenProvider, TokenProvider};
pub use client::{GoogleSpeechApi, SpeechApi};
pub use speech::{TranscriptionClient, SUPPORTED_LANGUAGES};
pub use types::{
    validate_format, AudioEncoding, AuthInfo, RecognitionRequest, RecognitionResult, WordInfo,
    DEFAULT_LANGUAGE, DEFAULT_SAMPLE_RATE, SUPPORTED_SAMPLE_RATES,
};
