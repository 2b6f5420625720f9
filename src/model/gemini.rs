//! Google Gemini provider implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ModelProvider, ModelRequest, ProviderError};
use crate::config::ModelConfig;

/// Gemini API request part
#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Gemini API request content
#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

/// Gemini API `generateContent` request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Gemini API `generateContent` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Gemini API error response
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

/// Gemini provider over the public REST API.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    endpoint: String,
    timeout: Duration,
}

impl GeminiProvider {
    pub fn new(config: &ModelConfig) -> Result<Self, ProviderError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.name
            ),
            timeout,
        })
    }

    fn build_request(request: &ModelRequest) -> GenerateContentRequest<'_> {
        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: &request.system,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &request.user,
                }],
            }],
            generation_config: request
                .temperature
                .map(|temperature| GenerationConfig { temperature }),
        }
    }

    fn map_send_error(&self, err: &reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.timeout)
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

/// Join the text parts of the first candidate
fn extract_text(response: GenerateContentResponse) -> Result<String, ProviderError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(ProviderError::EmptyResponse(reason));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ProviderError::EmptyResponse(
            candidate
                .finish_reason
                .unwrap_or_else(|| "empty candidate".to_string()),
        ));
    }
    Ok(text)
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, request: &ModelRequest) -> Result<String, ProviderError> {
        let body = Self::build_request(request);

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&text)
                .map_or(text, |envelope| envelope.error.message);
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::Decode(e.to_string()))?;
        extract_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT: &str = "/models/gemini-test:generateContent";

    fn provider_for(server: &MockServer) -> GeminiProvider {
        let config = ModelConfig {
            api_key: "test-key".to_string(),
            name: "gemini-test".to_string(),
            base_url: server.uri(),
            timeout_secs: 5,
        };
        GeminiProvider::new(&config).unwrap()
    }

    fn reply(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        })
    }

    #[test]
    fn test_request_shape() {
        let request = ModelRequest::new("be terse", "buy milk").with_temperature(0.0);
        let value = serde_json::to_value(GeminiProvider::build_request(&request)).unwrap();
        assert_eq!(
            value,
            json!({
                "systemInstruction": { "parts": [{ "text": "be terse" }] },
                "contents": [{ "role": "user", "parts": [{ "text": "buy milk" }] }],
                "generationConfig": { "temperature": 0.0 }
            })
        );
    }

    #[test]
    fn test_request_without_temperature_omits_generation_config() {
        let request = ModelRequest::new("be terse", "buy");
        let value = serde_json::to_value(GeminiProvider::build_request(&request)).unwrap();
        assert!(value.get("generationConfig").is_none());
    }

    #[tokio::test]
    async fn test_generate_returns_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "buy milk" }] }],
                "generationConfig": { "temperature": 0.0 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply(r#"{"ok":true}"#)))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let request = ModelRequest::new("system", "buy milk").with_temperature(0.0);
        let text = provider.generate(&request).await.unwrap();
        assert_eq!(text, r#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn test_generate_joins_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] }
                }]
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let text = provider
            .generate(&ModelRequest::new("system", "user"))
            .await
            .unwrap();
        assert_eq!(text, "{\"a\":1}");
    }

    #[tokio::test]
    async fn test_error_status_carries_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": { "code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED" }
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let err = provider
            .generate(&ModelRequest::new("system", "user"))
            .await
            .unwrap_err();
        match err {
            ProviderError::Status { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let err = provider
            .generate(&ModelRequest::new("system", "user"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse(ref r) if r == "SAFETY"));
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let err = provider
            .generate(&ModelRequest::new("system", "user"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Decode(_)));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(reply("late"))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = ModelConfig {
            api_key: "test-key".to_string(),
            name: "gemini-test".to_string(),
            base_url: server.uri(),
            timeout_secs: 1,
        };
        let provider = GeminiProvider::new(&config).unwrap();
        let err = provider
            .generate(&ModelRequest::new("system", "user"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Timeout(_)));
    }
}
