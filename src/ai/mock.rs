use super::{GeneratedImage, StylistService};
use crate::models::EventDetails;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// In-process stand-in for the Gemini stylist.
///
/// Clones share state, so a test can keep a handle after boxing the mock
/// into an [`crate::app::App`].
#[derive(Clone)]
pub struct MockStylistClient {
    styles: Arc<Mutex<Option<Vec<String>>>>,
    image_responses: Arc<Mutex<Vec<GeneratedImage>>>,
    fail_styles: Arc<Mutex<bool>>,
    fail_images: Arc<Mutex<bool>>,
    requested_styles: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockStylistClient {
    pub fn new() -> Self {
        Self {
            styles: Arc::new(Mutex::new(None)),
            image_responses: Arc::new(Mutex::new(Vec::new())),
            fail_styles: Arc::new(Mutex::new(false)),
            fail_images: Arc::new(Mutex::new(false)),
            requested_styles: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Replace the style list; an explicitly empty list is returned as-is.
    pub fn with_styles<S: Into<String>>(self, styles: impl IntoIterator<Item = S>) -> Self {
        *self.styles.lock().unwrap() = Some(styles.into_iter().map(Into::into).collect());
        *self.fail_styles.lock().unwrap() = false;
        self
    }

    pub fn with_image_response(self, response: GeneratedImage) -> Self {
        self.image_responses.lock().unwrap().push(response);
        self
    }

    pub fn failing_styles(self) -> Self {
        *self.fail_styles.lock().unwrap() = true;
        self
    }

    pub fn failing_images(self) -> Self {
        *self.fail_images.lock().unwrap() = true;
        self
    }

    /// Style descriptions passed to `generate_styled_image`, in call order.
    pub fn requested_styles(&self) -> Vec<String> {
        self.requested_styles.lock().unwrap().clone()
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Default image for a style: the style text behind a PNG signature.
    pub fn image_for_style(style: &str) -> GeneratedImage {
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(style.as_bytes());
        GeneratedImage {
            bytes,
            mime_type: "image/png".to_string(),
        }
    }
}

impl Default for MockStylistClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StylistService for MockStylistClient {
    async fn describe_styles(&self, event: &EventDetails, count: usize) -> Result<Vec<String>> {
        *self.call_count.lock().unwrap() += 1;

        if *self.fail_styles.lock().unwrap() {
            return Err(Error::AiService("mock style failure".to_string()));
        }

        match self.styles.lock().unwrap().as_ref() {
            Some(styles) => Ok(styles.clone()),
            // Default mock response
            None => Ok((1..=count)
                .map(|i| format!("{} outfit {} for {}", event.theme, i, event.event_type))
                .collect()),
        }
    }

    async fn generate_styled_image(
        &self,
        _photo: &[u8],
        _photo_mime_type: &str,
        _event: &EventDetails,
        style: &str,
    ) -> Result<GeneratedImage> {
        let count = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count
        };
        self.requested_styles.lock().unwrap().push(style.to_string());

        if *self.fail_images.lock().unwrap() {
            return Err(Error::NoImageReturned);
        }

        let responses = self.image_responses.lock().unwrap();
        if responses.is_empty() {
            Ok(Self::image_for_style(style))
        } else {
            let index = (count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn event() -> EventDetails {
        EventDetails::new("Gala", "Paris", "Black tie")
    }

    #[tokio::test]
    async fn test_mock_default_styles_match_count() {
        let client = MockStylistClient::new();
        let styles = client.describe_styles(&event(), 3).await.unwrap();
        assert_eq!(styles.len(), 3);
        assert!(styles[0].contains("Black tie"));
    }

    #[tokio::test]
    async fn test_mock_custom_styles_and_images() {
        let canned = GeneratedImage {
            bytes: vec![1, 2, 3],
            mime_type: "image/jpeg".to_string(),
        };
        let client = MockStylistClient::new()
            .with_styles(["tuxedo", "gown"])
            .with_image_response(canned.clone());

        let styles = client.describe_styles(&event(), 5).await.unwrap();
        assert_eq!(styles, vec!["tuxedo", "gown"]);

        let image = client
            .generate_styled_image(&[0], "image/png", &event(), "gown")
            .await
            .unwrap();
        assert_eq!(image, canned);
        assert_eq!(client.requested_styles(), vec!["gown"]);
    }

    #[tokio::test]
    async fn test_mock_failures_and_shared_state() {
        let client = MockStylistClient::new().failing_images();
        let handle = client.clone();

        let err = client
            .generate_styled_image(&[0], "image/png", &event(), "gown")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoImageReturned));
        assert_eq!(handle.get_call_count(), 1);

        let client = MockStylistClient::new().failing_styles();
        assert!(client.describe_styles(&event(), 5).await.is_err());
    }
}
