//! Voice Agent HTTP Server
//!
//! Actix-web REST API in front of the speech-to-text client

pub mod error;
pub mod routes;
pub mod state;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::body::MessageBody;
use actix_web::dev::{fn_service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{guard, web, App, HttpResponse, HttpServer};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;
use voiceagent_common::{AppConfig, Result};

pub use state::AppState;

/// Multipart audio upload limit
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// JSON request body limit
pub const JSON_BODY_LIMIT: usize = 50 * 1024 * 1024;

/// JSON extractor settings: size limit and envelope-shaped errors
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| {
            let response = match &err {
                JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
                    HttpResponse::PayloadTooLarge()
                        .json(types::ApiResponse::failure("Request body exceeds the 50 MB limit"))
                }
                other => HttpResponse::BadRequest()
                    .json(types::ApiResponse::failure(format!("Invalid JSON body: {}", other))),
            };
            InternalError::from_response(err, response).into()
        })
}

/// Build the application: middleware, API routes, optional static files and
/// the 404 fallback
pub fn build_app(
    state: web::Data<Arc<AppState>>,
    static_dir: Option<&Path>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .wrap(Cors::permissive())
        .wrap(TracingLogger::default())
        .app_data(state)
        .app_data(json_config())
        .configure(routes::configure);

    // Files mounted at "/" answers every unmatched GET/HEAD path, so it gets
    // the same 404 envelope as the default service. Other methods must skip
    // it entirely or they end up as 405 from the file service.
    let app = match static_dir {
        Some(dir) => app.service(
            Files::new("/", dir)
                .guard(guard::Any(guard::Get()).or(guard::Head()))
                .index_file("index.html")
                .default_handler(fn_service(|req: ServiceRequest| async {
                    let (req, _) = req.into_parts();
                    Ok::<_, actix_web::Error>(ServiceResponse::new(req, routes::not_found_response()))
                })),
        ),
        None => app,
    };

    app.default_service(web::to(routes::not_found))
}

/// Start the HTTP server and run until shutdown
pub async fn start_server(config: AppConfig) -> Result<()> {
    config.validate()?;

    let bind_addr = config.server_bind_address();
    let static_dir = Some(config.static_dir.clone()).filter(|dir| dir.is_dir());
    match &static_dir {
        Some(dir) => info!("Serving static files from {}", dir.display()),
        None => warn!(
            "Static directory {} not found; static file serving disabled",
            config.static_dir.display()
        ),
    }

    let state = web::Data::new(Arc::new(AppState::new(config)?));

    info!("Voice Agent Speech-to-Text service listening on http://{}", bind_addr);
    info!("  Health check: http://{}/health", bind_addr);
    info!("  Speech-to-text: http://{}/api/speech-to-text", bind_addr);
    info!("  Test component: http://{}/api/test", bind_addr);

    HttpServer::new(move || build_app(state.clone(), static_dir.as_deref()))
        .bind(&bind_addr)?
        .run()
        .await?;

    info!("Server stopped");
    Ok(())
}
