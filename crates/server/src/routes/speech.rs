use actix_multipart::{Field, Multipart};
use actix_web::{post, web, HttpResponse};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use futures_util::StreamExt;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use voiceagent_stt::{validate_format, AudioEncoding, RecognitionRequest, DEFAULT_LANGUAGE, DEFAULT_SAMPLE_RATE};

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{ApiResponse, StreamRequest};
use crate::MAX_UPLOAD_BYTES;

/// Largest accepted non-file form field
const MAX_FIELD_BYTES: usize = 64 * 1024;

const INVALID_FORMAT: &str = "Invalid audio format or sample rate";

/// Standard alphabet, padding optional
const CHUNK_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode a base64 audio chunk, tolerating missing padding and line wrapping
fn decode_chunk(chunk: &str) -> Option<Vec<u8>> {
    let compact: String = chunk.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    CHUNK_BASE64.decode(compact).ok()
}

/// Parsed multipart form
#[derive(Debug, Default)]
struct UploadForm {
    audio: Option<Vec<u8>>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.trim()).filter(|s| !s.is_empty())
    }
}

/// Read a field completely, failing once it grows past `limit`
async fn read_field(field: &mut Field, limit: usize, name: &str) -> Result<Vec<u8>, ApiError> {
    let mut data = Vec::new();

    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        if data.len() + chunk.len() > limit {
            return Err(if name == "audio" {
                ApiError::PayloadTooLarge(format!(
                    "Audio file exceeds the {} MB limit",
                    limit / (1024 * 1024)
                ))
            } else {
                ApiError::bad_request(format!("Form field '{}' is too large", name))
            });
        }
        data.extend_from_slice(&chunk);
    }

    Ok(data)
}

async fn read_upload_form(payload: &mut Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = payload.next().await {
        let mut field = field?;
        let name = field
            .content_disposition()
            .get_name()
            .unwrap_or_default()
            .to_string();

        if name == "audio" {
            let is_audio = field
                .content_type()
                .map(|mime| mime.type_().as_str() == "audio")
                .unwrap_or(false);
            if !is_audio {
                return Err(ApiError::bad_request("Only audio files are allowed"));
            }

            form.audio = Some(read_field(&mut field, MAX_UPLOAD_BYTES, &name).await?);
        } else {
            let data = read_field(&mut field, MAX_FIELD_BYTES, &name).await?;
            form.fields.insert(name, String::from_utf8_lossy(&data).into_owned());
        }
    }

    Ok(form)
}

/// Transcribe an uploaded audio file
#[post("/api/speech-to-text")]
pub async fn speech_to_text(
    mut payload: Multipart,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let mut form = read_upload_form(&mut payload).await?;

    let Some(audio) = form.audio.take() else {
        return Err(ApiError::bad_request("Audio file is required"));
    };

    let encoding_name = form.field("encoding").unwrap_or(AudioEncoding::Linear16.as_str());
    let sample_rate = match form.field("sampleRateHertz") {
        Some(raw) => raw.parse::<u32>().map_err(|_| ApiError::bad_request(INVALID_FORMAT))?,
        None => DEFAULT_SAMPLE_RATE,
    };

    if !validate_format(encoding_name, Some(sample_rate)) {
        return Err(ApiError::bad_request(INVALID_FORMAT));
    }
    let encoding: AudioEncoding = encoding_name
        .parse()
        .map_err(|_| ApiError::bad_request(INVALID_FORMAT))?;

    let request = RecognitionRequest::new(audio, encoding)
        .with_sample_rate(sample_rate)
        .with_language(form.field("languageCode").unwrap_or(DEFAULT_LANGUAGE))
        .with_word_time_offsets(form.field("enableWordTimeOffsets") == Some("true"))
        .with_automatic_punctuation(
            form.field("enableAutomaticPunctuation")
                .map_or(true, |v| v == "true"),
        );

    info!(
        "Speech-to-text request - Bytes: {}, Encoding: {}, Sample rate: {}",
        request.audio.len(),
        encoding,
        sample_rate
    );

    let result = state.speech.recognize(&request).await?;

    Ok(HttpResponse::Ok().json(
        ApiResponse::ok(result).with_message("Speech recognition completed successfully"),
    ))
}

/// Transcribe one base64 audio chunk as an independent call
#[post("/api/speech-to-text/stream")]
pub async fn speech_to_text_stream(
    req: web::Json<StreamRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();

    let chunk = req
        .audio_chunk
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::bad_request("Audio chunk is required"))?;

    let audio = decode_chunk(chunk)
        .ok_or_else(|| ApiError::bad_request("Audio chunk must be valid base64"))?;

    let encoding_name = req
        .encoding
        .as_deref()
        .filter(|e| !e.is_empty())
        .unwrap_or(AudioEncoding::Linear16.as_str());

    let sample_rate = match &req.sample_rate_hertz {
        Some(raw) => raw.value().ok_or_else(|| ApiError::bad_request(INVALID_FORMAT))?,
        None => DEFAULT_SAMPLE_RATE,
    };

    let encoding: AudioEncoding = encoding_name
        .parse()
        .map_err(|_| ApiError::bad_request(INVALID_FORMAT))?;
    if !validate_format(encoding_name, Some(sample_rate)) {
        return Err(ApiError::bad_request(INVALID_FORMAT));
    }

    debug!("Stream chunk - Bytes: {}, Encoding: {}, Sample rate: {}", audio.len(), encoding, sample_rate);

    let transcript = state
        .speech
        .recognize_chunk(&audio, Some(encoding), Some(sample_rate))
        .await?;

    Ok(HttpResponse::Ok().json(
        ApiResponse::ok(transcript).with_message("Audio chunk processed successfully"),
    ))
}
