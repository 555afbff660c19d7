pub mod health;
pub mod info;
pub mod speech;

use actix_web::{web, HttpResponse};

use crate::types::ApiResponse;

/// Register every API route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(info::test_component)
        .service(info::auth_info)
        .service(info::supported_formats)
        .service(info::supported_languages)
        .service(speech::speech_to_text)
        .service(speech::speech_to_text_stream);
}

/// Reply for unmatched routes
pub fn not_found_response() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::failure("Endpoint not found"))
}

pub async fn not_found() -> HttpResponse {
    not_found_response()
}
