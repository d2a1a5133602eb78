use super::upload::read_generate_form;
use super::{MAX_UPLOAD_SIZE, SESSION_HEADER};
use crate::app::App;
use crate::models::SwapStyleRequest;
use crate::{Error, Result};
use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use tracing::{error, info};

pub async fn health() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("OK")
}

/// `POST /api/v1/generate`
pub async fn generate(app: web::Data<App>, payload: Multipart) -> Result<HttpResponse> {
    let form = read_generate_form(payload, MAX_UPLOAD_SIZE).await?;
    info!(
        event_type = %form.event.event_type,
        venue = %form.event.venue,
        theme = %form.event.theme,
        "Received generation request"
    );

    let generated = app.generate_session(form.photo, form.event).await?;

    Ok(HttpResponse::Ok()
        .content_type(generated.image.mime_type)
        .insert_header((SESSION_HEADER, generated.session_id))
        .body(generated.image.bytes))
}

/// `GET /api/v1/styles`
pub async fn list_styles(app: web::Data<App>, req: HttpRequest) -> Result<HttpResponse> {
    let session_id = session_id(&req)?;
    let styles = app.list_styles(&session_id)?;
    Ok(HttpResponse::Ok().json(styles))
}

/// `POST /api/v1/swap-style`
pub async fn swap_style(
    app: web::Data<App>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let session_id = session_id(&req)?;

    let swap: SwapStyleRequest = serde_json::from_slice(&body).map_err(|e| {
        error!(session_id = %session_id, "Failed to decode swap style request: {}", e);
        Error::Validation("Invalid request body.".to_string())
    })?;

    let image = app.swap_style(&session_id, swap.style_index).await?;

    Ok(HttpResponse::Ok()
        .content_type(image.mime_type)
        .body(image.bytes))
}

fn session_id(req: &HttpRequest) -> Result<String> {
    req.headers()
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            error!("Missing {} header", SESSION_HEADER);
            Error::Validation(format!("Missing {} header.", SESSION_HEADER))
        })
}
