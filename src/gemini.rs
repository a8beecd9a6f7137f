//! Gemini API client
//!
//! `POST {base}/models/{model}:generateContent` with the system instruction,
//! the image as inline data, the user prompt, and a JSON response schema.

use crate::config::Config;
use crate::error::{JacketAiError, Result};
use crate::provider::{EstimationProvider, EstimationRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini API request
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: String,
    response_schema: serde_json::Value,
}

/// Gemini API response
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate, empty when there is none
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

fn build_request(request: &EstimationRequest, temperature: f32) -> GeminiRequest {
    GeminiRequest {
        system_instruction: Content {
            parts: vec![Part::Text {
                text: request.prompt.system_instruction.clone(),
            }],
        },
        contents: vec![Content {
            parts: vec![
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: request.image.mime_type.clone(),
                        data: request.image.data.clone(),
                    },
                },
                Part::Text {
                    text: request.prompt.user_prompt.clone(),
                },
            ],
        }],
        generation_config: GenerationConfig {
            temperature,
            response_mime_type: "application/json".to_string(),
            response_schema: request.prompt.response_schema.clone(),
        },
    }
}

/// Cut a response body for error messages
fn excerpt(body: &str, max_chars: usize) -> String {
    let mut out: String = body.chars().take(max_chars).collect();
    if body.chars().count() > max_chars {
        out.push('…');
    }
    out
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
        temperature: f32,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
            temperature,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.get_api_key()?,
            config.model.clone(),
            config.api_base_url.clone(),
            Duration::from_secs(config.timeout_seconds),
            config.temperature,
        )
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl EstimationProvider for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &EstimationRequest) -> Result<String> {
        let body = build_request(request, self.temperature);

        tracing::debug!(
            model = %self.model,
            language = %request.language,
            mime_type = %request.image.mime_type,
            image_bytes = request.image.data.len(),
            prompt_chars = request.prompt.user_prompt.chars().count(),
            "sending generateContent request"
        );

        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, "Gemini API returned an error");
            return Err(JacketAiError::ApiCall(format!(
                "Gemini API error {}: {}",
                status,
                excerpt(&text, 300)
            )));
        }

        let response: GeminiResponse = serde_json::from_str(&text)
            .map_err(|e| JacketAiError::ApiParse(format!("unexpected Gemini payload: {}", e)))?;

        if let Some(reason) = response.candidates.first().and_then(|c| c.finish_reason.as_deref()) {
            tracing::debug!(finish_reason = reason, "Gemini candidate finished");
        }

        let output = response.text();
        tracing::debug!(response_chars = output.chars().count(), "Gemini response received");
        Ok(output)
    }
}
