use super::client::GeminiHttpClient;
use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData, Part,
};
use crate::ai::InferenceService;
use crate::image::DataUrl;
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Sends a stone photo plus prompt to Gemini and returns the text answer.
pub struct GeminiStoneClient {
    http: GeminiHttpClient,
}

impl GeminiStoneClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, Duration::from_secs(30), reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, timeout, client),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    fn build_request(image: &DataUrl, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::Text {
                        text: prompt.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type().to_string(),
                            data: image.payload().to_string(),
                        },
                    },
                ],
            }],
            generation_config: Some(GenerationConfig {
                max_output_tokens: Some(2048),
                temperature: Some(0.4),
            }),
        }
    }
}

#[async_trait]
impl InferenceService for GeminiStoneClient {
    async fn analyze(&self, image: &DataUrl, prompt: &str) -> Result<String> {
        if image.is_empty() {
            return Err(Error::Inference(
                "No image data to analyze. Please upload a photo first.".to_string(),
            ));
        }

        tracing::debug!(
            "Analyzing {} image (~{} bytes) with {}",
            image.mime_type(),
            image.decoded_len(),
            self.http.model()
        );

        let request = Self::build_request(image, prompt);
        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        let text = response.first_text().ok_or_else(|| {
            Error::Inference("No analysis returned from Gemini. Please try again.".to_string())
        })?;

        tracing::info!("Gemini returned {} chars of analysis", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DEFAULT_MODEL: &str = "gemini-2.0-flash";

    fn make_client(server: &MockServer, model: &str) -> GeminiStoneClient {
        GeminiStoneClient::new("test-key".to_string(), model.to_string())
            .with_base_url(server.uri())
    }

    fn jpeg() -> DataUrl {
        DataUrl::from_bytes("image/jpeg", &[0xFF, 0xD8, 0xFF, 0xE0])
    }

    #[tokio::test]
    async fn test_analyze_sends_inline_image_and_prompt() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_string_contains("\"inlineData\""))
            .and(body_string_contains("\"mimeType\":\"image/jpeg\""))
            .and(body_string_contains("/9j/4A=="))
            .and(body_string_contains("Describe this stone"))
            .respond_with(test_support::text_response("1. Stone Identification:\n- Name: Basalt"))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, DEFAULT_MODEL);
        let text = client.analyze(&jpeg(), "Describe this stone").await.unwrap();
        assert_eq!(text, "1. Stone Identification:\n- Name: Basalt");
    }

    #[tokio::test]
    async fn test_analyze_strips_models_prefix() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .respond_with(test_support::text_response("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, "models/gemini-2.0-flash");
        client.analyze(&jpeg(), "prompt").await.unwrap();
    }

    #[tokio::test]
    async fn test_api_error_returns_inference_error() {
        let server = MockServer::start().await;

        test_support::post_generate_content()
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let client = make_client(&server, DEFAULT_MODEL);
        let err = client.analyze(&jpeg(), "prompt").await.unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn test_empty_candidates_is_inference_error() {
        let server = MockServer::start().await;

        test_support::post_generate_content()
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": []
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, DEFAULT_MODEL);
        let err = client.analyze(&jpeg(), "prompt").await.unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_inference_error() {
        let server = MockServer::start().await;

        test_support::post_generate_content()
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = make_client(&server, DEFAULT_MODEL);
        let err = client.analyze(&jpeg(), "prompt").await.unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[tokio::test]
    async fn test_empty_image_rejected_without_request() {
        let server = MockServer::start().await;

        test_support::post_generate_content()
            .respond_with(test_support::text_response("unused"))
            .expect(0)
            .mount(&server)
            .await;

        let client = make_client(&server, DEFAULT_MODEL);
        let empty = DataUrl::from_bytes("image/png", &[]);
        let err = client.analyze(&empty, "prompt").await.unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[tokio::test]
    async fn test_slow_response_times_out_as_inference_error() {
        let server = MockServer::start().await;

        test_support::post_generate_content()
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "candidates": [] }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = GeminiStoneClient::new_with_client(
            "test-key".to_string(),
            DEFAULT_MODEL.to_string(),
            Duration::from_millis(200),
            reqwest::Client::new(),
        )
        .with_base_url(server.uri());

        let err = client.analyze(&jpeg(), "prompt").await.unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
        assert!(err.to_string().starts_with("Failed to reach Gemini"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_inference_error() {
        // Nothing listens on port 1, so the connection is refused.
        let client = GeminiStoneClient::new("test-key".to_string(), DEFAULT_MODEL.to_string())
            .with_base_url("http://127.0.0.1:1".to_string());

        let err = client.analyze(&jpeg(), "prompt").await.unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
        assert!(err.to_string().starts_with("Failed to reach Gemini"));
    }
}
