use actix_web::{get, HttpResponse};

use crate::types::{now_iso, HealthResponse};

pub const SERVICE_NAME: &str = "Voice Agent - Speech-to-Text";

/// Liveness probe
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "OK",
        timestamp: now_iso(),
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}
