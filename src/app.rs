//! Application orchestration for generating and swapping outfit styles.

use crate::ai::{GeminiStylistClient, GeneratedImage, StylistService};
use crate::models::{Config, EventDetails};
use crate::session::{SessionId, SessionRecord, SessionStore};
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{error, info};

/// Photo bytes as uploaded, with their resolved encoding.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Result of a successful generate call.
#[derive(Debug, Clone)]
pub struct GeneratedSession {
    pub session_id: SessionId,
    pub image: GeneratedImage,
}

/// Coordinates the stylist and the session store for each endpoint.
pub struct App {
    stylist: Box<dyn StylistService>,
    sessions: SessionStore,
    style_count: usize,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub stylist: Box<dyn StylistService>,
    pub sessions: SessionStore,
}

impl App {
    /// Build an app from concrete service dependencies.
    pub fn with_services(services: AppServices, style_count: usize) -> Self {
        Self {
            stylist: services.stylist,
            sessions: services.sessions,
            style_count: style_count.max(1),
        }
    }

    /// Construct an app backed by Gemini from environment configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        info!(
            "Stylist provider: Gemini (styles: {}, images: {})",
            config.style_model, config.image_model
        );
        let stylist = GeminiStylistClient::new_with_client(
            config.gemini_api_key.clone(),
            config.style_model.clone(),
            config.image_model.clone(),
            config.ai_timeout,
            http_client,
        )
        .with_base_url(config.gemini_base_url.clone());

        Ok(Self::with_services(
            AppServices {
                stylist: Box::new(stylist),
                sessions: SessionStore::new(config.session_capacity),
            },
            config.style_count,
        ))
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Suggest styles, open a session, and render the photo in the first style.
    ///
    /// The new session is removed again if rendering fails or this future is
    /// dropped first, so an id that was never returned does not stay
    /// addressable.
    pub async fn generate_session(
        &self,
        photo: PhotoUpload,
        event: EventDetails,
    ) -> Result<GeneratedSession> {
        event.validate()?;
        if photo.bytes.is_empty() {
            return Err(Error::Validation("Invalid image file provided.".to_string()));
        }

        let styles = self
            .stylist
            .describe_styles(&event, self.style_count)
            .await
            .inspect_err(|e| {
                error!(
                    event_type = %event.event_type,
                    venue = %event.venue,
                    theme = %event.theme,
                    "Failed to get style suggestions: {}",
                    e
                );
            })?;

        if styles.is_empty() {
            error!(
                event_type = %event.event_type,
                venue = %event.venue,
                theme = %event.theme,
                "No style suggestions returned"
            );
            return Err(Error::NoStyles);
        }

        let record = Arc::new(SessionRecord {
            styles,
            image: photo.bytes,
            mime_type: photo.mime_type,
            event,
        });
        let pending = self.sessions.create_pending(Arc::clone(&record));
        info!(session_id = %pending.id(), styles = record.styles.len(), "Created session");

        let image = self
            .stylist
            .generate_styled_image(&record.image, &record.mime_type, &record.event, &record.styles[0])
            .await
            .inspect_err(|e| {
                error!(
                    session_id = %pending.id(),
                    event_type = %record.event.event_type,
                    venue = %record.event.venue,
                    theme = %record.event.theme,
                    "Failed to generate initial image: {}",
                    e
                );
            })?;

        Ok(GeneratedSession {
            session_id: pending.commit(),
            image,
        })
    }

    pub fn list_styles(&self, session_id: &str) -> Result<Vec<String>> {
        let record = self.lookup(session_id)?;
        Ok(record.styles.clone())
    }

    /// Re-render the stored photo in the style at `style_index`.
    pub async fn swap_style(&self, session_id: &str, style_index: i64) -> Result<GeneratedImage> {
        let record = self.lookup(session_id)?;

        let style = usize::try_from(style_index)
            .ok()
            .and_then(|index| record.style(index))
            .ok_or_else(|| {
                error!(
                    session_id = %session_id,
                    style_index,
                    num_styles = record.styles.len(),
                    "Invalid style index"
                );
                Error::Validation("Invalid style index.".to_string())
            })?;

        info!(session_id = %session_id, style_index, "Swapping style");

        self.stylist
            .generate_styled_image(&record.image, &record.mime_type, &record.event, style)
            .await
            .inspect_err(|e| {
                error!(
                    session_id = %session_id,
                    style_index,
                    event_type = %record.event.event_type,
                    "Failed to generate swapped image: {}",
                    e
                );
            })
    }

    fn lookup(&self, session_id: &str) -> Result<Arc<SessionRecord>> {
        self.sessions.get(session_id).ok_or_else(|| {
            error!(session_id = %session_id, "Session data not found");
            Error::SessionNotFound(session_id.to_string())
        })
    }
}
