//! HTTP front door
//!
//! Routes the three `/api/v1` endpoints plus `/health` onto [`crate::app::App`],
//! with CORS for the web client and request logging.

pub mod response;
pub mod routes;
pub mod upload;

use crate::app::App;
use crate::models::Config;
use actix_cors::Cors;
use actix_web::http::header::{self, HeaderName};
use actix_web::{middleware, web, HttpServer};
use std::time::Duration;
use tracing::{info, warn};

/// Header carrying the session identifier in both directions.
pub const SESSION_HEADER: &str = "X-Session-ID";

/// Upper bound on the whole multipart body of a generate request.
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Register all routes. Shared by [`run`] and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(routes::health)))
        .service(
            web::scope("/api/v1")
                .service(web::resource("/generate").route(web::post().to(routes::generate)))
                .service(web::resource("/styles").route(web::get().to(routes::list_styles)))
                .service(web::resource("/swap-style").route(web::post().to(routes::swap_style))),
        );
}

pub fn cors(allowed_origins: &[String]) -> Cors {
    let session_header = HeaderName::from_static("x-session-id");
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, session_header.clone()])
        .expose_headers(vec![session_header])
        .max_age(3600);

    for origin in allowed_origins {
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else if origin.contains("://") {
            cors = cors.allowed_origin(origin);
        } else {
            warn!("Ignoring CORS origin without a scheme: {}", origin);
        }
    }
    cors
}

/// Serve until the process is stopped.
pub async fn run(app: App, config: &Config) -> std::io::Result<()> {
    let app = web::Data::new(app);
    let origins = config.allowed_origins.clone();

    info!("Starting server on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        actix_web::App::new()
            .app_data(app.clone())
            .wrap(cors(&origins))
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .keep_alive(Duration::from_secs(60))
    .client_request_timeout(Duration::from_secs(10))
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
