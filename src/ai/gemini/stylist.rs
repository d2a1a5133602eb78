use super::client::GeminiHttpClient;
use super::types::{
    permissive_safety_settings, Content, GenerateContentResponse, InlineData, Part, SafetySetting,
};
use crate::ai::{extract_json_array, GeneratedImage, StylistService};
use crate::models::EventDetails;
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use base64::Engine as _;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct StyleRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageRequest {
    contents: Vec<Content>,
    safety_settings: Vec<SafetySetting>,
    generation_config: ImageGenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageGenerationConfig {
    response_modalities: Vec<String>,
}

/// Gemini-backed stylist: a text model for suggestions, an image model for
/// restyled photos.
pub struct GeminiStylistClient {
    styles: GeminiHttpClient,
    images: GeminiHttpClient,
}

impl GeminiStylistClient {
    pub fn new_with_client(
        api_key: String,
        style_model: String,
        image_model: String,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        Self {
            styles: GeminiHttpClient::new_with_client(
                api_key.clone(),
                style_model,
                timeout,
                client.clone(),
            ),
            images: GeminiHttpClient::new_with_client(api_key, image_model, timeout, client),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.styles = self.styles.with_base_url(base_url.clone());
        self.images = self.images.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl StylistService for GeminiStylistClient {
    async fn describe_styles(&self, event: &EventDetails, count: usize) -> Result<Vec<String>> {
        let prompt = prompts::style_suggestions(event, count);
        tracing::debug!("Style suggestion prompt: {}", prompt);

        let request = StyleRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::text(prompt)],
            }],
        };

        let response: GenerateContentResponse = self.styles.generate_content(&request).await?;

        let text = response.text().ok_or_else(|| {
            tracing::error!(
                "No text content in Gemini style response (finish reason: {:?})",
                response.finish_reason()
            );
            Error::ResponseFormat("no text content found in Gemini response".to_string())
        })?;

        let styles = extract_json_array(&text).inspect_err(|e| {
            tracing::error!("{}; raw response: {}", e, text);
        })?;

        tracing::info!(
            "Gemini returned {} style suggestions ({})",
            styles.len(),
            self.styles.model()
        );
        Ok(styles)
    }

    async fn generate_styled_image(
        &self,
        photo: &[u8],
        photo_mime_type: &str,
        event: &EventDetails,
        style: &str,
    ) -> Result<GeneratedImage> {
        let prompt = prompts::styled_image(event, style);
        tracing::debug!("Styled image prompt: {}", prompt);

        let request = ImageRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::text(prompt),
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: photo_mime_type.to_string(),
                            data: base64::engine::general_purpose::STANDARD.encode(photo),
                        },
                    },
                ],
            }],
            safety_settings: permissive_safety_settings(),
            generation_config: ImageGenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
            },
        };

        let response: GenerateContentResponse = self.images.generate_content(&request).await?;

        let inline_data = response.inline_data().ok_or_else(|| {
            tracing::error!(
                "No image data found in Gemini response (finish reason: {:?}, text: {:?})",
                response.finish_reason(),
                response.text()
            );
            Error::NoImageReturned
        })?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&inline_data.data)
            .map_err(|e| {
                Error::ResponseFormat(format!("Failed to decode Gemini base64 image: {}", e))
            })?;

        tracing::info!(
            "Generated image with mime_type {} ({} bytes)",
            inline_data.mime_type,
            bytes.len()
        );

        Ok(GeneratedImage {
            bytes,
            mime_type: inline_data.mime_type.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const STYLE_MODEL: &str = "gemini-2.5-flash";
    const IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";

    fn make_client(server: &MockServer) -> GeminiStylistClient {
        client_for(server, "test-key", STYLE_MODEL)
    }

    fn client_for(server: &MockServer, api_key: &str, style_model: &str) -> GeminiStylistClient {
        GeminiStylistClient::new_with_client(
            api_key.to_string(),
            style_model.to_string(),
            IMAGE_MODEL.to_string(),
            Duration::from_secs(5),
            reqwest::Client::new(),
        )
        .with_base_url(server.uri())
    }

    fn wedding() -> EventDetails {
        EventDetails::new("Wedding", "Goa, India", "South style wedding")
    }

    #[tokio::test]
    async fn test_describe_styles_parses_embedded_array() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/v1beta/models/{}:generateContent", STYLE_MODEL)))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_string_contains("Goa, India"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "parts": [
                            { "text": "Sure! ```json\n[\"a silk veshti\", " },
                            { "text": "\"a kanjivaram saree\"]\n```" }
                        ]
                    }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let styles = make_client(&server)
            .describe_styles(&wedding(), 5)
            .await
            .unwrap();
        assert_eq!(styles, vec!["a silk veshti", "a kanjivaram saree"]);
    }

    #[tokio::test]
    async fn test_describe_styles_without_array_is_format_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "I would suggest something linen." }] }
                }]
            })))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .describe_styles(&wedding(), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ResponseFormat(_)));
    }

    #[tokio::test]
    async fn test_describe_styles_empty_candidates_is_format_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
            )
            .mount(&server)
            .await;

        let err = make_client(&server)
            .describe_styles(&wedding(), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ResponseFormat(_)));
    }

    #[tokio::test]
    async fn test_api_error_returns_ai_service_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = make_client(&server);

        let err = client.describe_styles(&wedding(), 5).await.unwrap_err();
        assert!(matches!(err, Error::AiService(ref msg) if !msg.contains("quota")));

        let err = client
            .generate_styled_image(&[0xFF, 0xD8, 0xFF], "image/jpeg", &wedding(), "veshti")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiService(_)));
    }

    #[tokio::test]
    async fn test_generate_styled_image_sends_photo_and_returns_inline_data() {
        let server = MockServer::start().await;

        let photo = vec![0xFF, 0xD8, 0xFF, 0xE0];
        let photo_b64 = base64::engine::general_purpose::STANDARD.encode(&photo);
        let generated = vec![0x89, 0x50, 0x4E, 0x47];
        let generated_b64 = base64::engine::general_purpose::STANDARD.encode(&generated);

        Mock::given(method("POST"))
            .and(path(format!("/v1beta/models/{}:generateContent", IMAGE_MODEL)))
            .and(body_string_contains(photo_b64.as_str()))
            .and(body_string_contains("\"mimeType\":\"image/jpeg\""))
            .and(body_string_contains("a kanjivaram saree"))
            .and(body_string_contains("\"safetySettings\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "parts": [
                            { "text": "Here is your look." },
                            { "inlineData": { "mimeType": "image/png", "data": generated_b64 } }
                        ]
                    }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let image = make_client(&server)
            .generate_styled_image(&photo, "image/jpeg", &wedding(), "a kanjivaram saree")
            .await
            .unwrap();

        assert_eq!(
            image,
            GeneratedImage {
                bytes: generated,
                mime_type: "image/png".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_generate_styled_image_without_inline_data() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "I can't edit this photo." }] },
                    "finishReason": "STOP"
                }]
            })))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .generate_styled_image(&[0x00], "image/png", &wedding(), "veshti")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoImageReturned));
    }

    #[tokio::test]
    async fn test_generate_styled_image_rejects_invalid_base64() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "parts": [{
                            "inlineData": { "mimeType": "image/png", "data": "!!!invalid-base64!!!" }
                        }]
                    }
                }]
            })))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .generate_styled_image(&[0x00], "image/png", &wedding(), "veshti")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ResponseFormat(_)));
    }

    #[tokio::test]
    async fn test_models_prefix_is_stripped() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "[\"kurta\"]" }] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, "k", "models/gemini-2.5-flash");

        client.describe_styles(&wedding(), 1).await.unwrap();
    }
}
