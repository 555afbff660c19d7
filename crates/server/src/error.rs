use actix_multipart::MultipartError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use tracing::{error, warn};
use voiceagent_common::VoiceAgentError;

use crate::types::ApiResponse;

/// Client-facing message for failures whose cause stays in the logs
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Handler error, rendered as the JSON failure envelope
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request rejected before reaching the speech client
    #[error("{0}")]
    BadRequest(String),

    /// Upload larger than the configured limit
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Failure reported by the speech client or auth provider
    #[error(transparent)]
    Service(#[from] VoiceAgentError),
}

impl ApiError {
    pub fn bad_request<S: Into<String>>(msg: S) -> Self {
        Self::BadRequest(msg.into())
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        Self::BadRequest(format!("Invalid multipart payload: {}", e))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Service(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Self::Service(e) if !e.is_client_visible() => {
                error!("Unhandled error: {}", e);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            Self::Service(e) => {
                warn!("Request failed: {}", e);
                e.to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ApiResponse::failure(message))
    }
}
