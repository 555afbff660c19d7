use actix_web::{get, web, HttpResponse};
use std::sync::Arc;
use tracing::info;

use crate::state::AppState;
use crate::types::{now_iso, ApiResponse, ComponentStatus, SupportedFormats, SupportedLanguages};

/// Exercise credentials and the speech client
#[get("/api/test")]
pub async fn test_component(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let working = state.speech.test_connection().await;
    info!("Component test finished: working={}", working);

    HttpResponse::Ok().json(ApiResponse::ok(ComponentStatus {
        component: "speech-to-text",
        status: if working { "working" } else { "not working" },
        auth: state.speech.auth_info(),
        timestamp: now_iso(),
    }))
}

#[get("/api/auth-info")]
pub async fn auth_info(state: web::Data<Arc<AppState>>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(state.speech.auth_info()).with_timestamp())
}

#[get("/api/supported-formats")]
pub async fn supported_formats(state: web::Data<Arc<AppState>>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(SupportedFormats {
        encodings: state.speech.supported_encodings(),
        sample_rates: state.speech.supported_sample_rates(),
        timestamp: now_iso(),
    }))
}

#[get("/api/supported-languages")]
pub async fn supported_languages(state: web::Data<Arc<AppState>>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(SupportedLanguages {
        languages: state.speech.list_supported_languages(),
        timestamp: now_iso(),
    }))
}
