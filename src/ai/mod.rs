//! AI service integration for outfit suggestions and restyled photos
//!
//! Wraps Gemini's `generateContent` API behind [`StylistService`] so the
//! orchestration layer can run against [`MockStylistClient`] in tests.

pub mod gemini;
pub mod mime;
pub mod mock;

pub use gemini::GeminiStylistClient;
pub use mock::MockStylistClient;

use crate::models::EventDetails;
use crate::{Error, Result};
use async_trait::async_trait;

/// Image bytes returned by the model together with their encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

#[async_trait]
pub trait StylistService: Send + Sync {
    /// Ask for `count` outfit descriptions suited to the event.
    async fn describe_styles(&self, event: &EventDetails, count: usize) -> Result<Vec<String>>;

    /// Restyle `photo` so the people in it wear `style` at the event.
    async fn generate_styled_image(
        &self,
        photo: &[u8],
        photo_mime_type: &str,
        event: &EventDetails,
        style: &str,
    ) -> Result<GeneratedImage>;
}

/// Parse the JSON string array embedded in a free-form model reply.
///
/// The array spans from the first `[` to the last `]`, so surrounding prose
/// and markdown fences are ignored.
pub fn extract_json_array(text: &str) -> Result<Vec<String>> {
    let start = text.find('[');
    let end = text.rfind(']');

    let json = match (start, end) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => {
            return Err(Error::ResponseFormat(
                "could not find a JSON array in the AI response".to_string(),
            ))
        }
    };

    serde_json::from_str(json).map_err(|e| {
        Error::ResponseFormat(format!("failed to parse style suggestions JSON: {}", e))
    })
}
