//! Error to HTTP response conversion.
//!
//! Bodies are short plain-text messages; details of AI failures stay in the
//! logs.

use crate::Error;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl Error {
    /// Message safe to show to API clients.
    pub fn client_message(&self) -> String {
        match self {
            Error::Validation(msg) => msg.clone(),
            Error::SessionNotFound(_) => "Session expired or invalid.".to_string(),
            Error::AiService(_) | Error::Http(_) => {
                "The image generation service is unavailable. Please try again.".to_string()
            }
            Error::ResponseFormat(_) => {
                "Received an unexpected response from the image generation service.".to_string()
            }
            Error::NoStyles => "No style suggestions could be generated.".to_string(),
            Error::NoImageReturned => "Failed to generate image.".to_string(),
            Error::Config(_) => "Internal server error.".to_string(),
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::SessionNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.client_message())
    }
}
