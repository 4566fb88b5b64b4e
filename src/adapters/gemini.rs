//! `generateContent` client for the Gemini REST API.

use crate::core::advisor::AdvisoryClient;
use crate::domain::model::ChatRole;
use crate::domain::ports::{AdvisorSettings, GenerationRequest, GenerativeService, ResponseFormat};
use crate::utils::error::{AdvisorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WirePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<WireContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

fn text_content(role: Option<&str>, text: &str) -> WireContent {
    WireContent {
        role: role.map(str::to_string),
        parts: vec![WirePart {
            text: Some(text.to_string()),
        }],
    }
}

impl From<&GenerationRequest> for GenerateContentRequest {
    fn from(request: &GenerationRequest) -> Self {
        let contents = request
            .contents
            .iter()
            .map(|turn| {
                let role = match turn.role {
                    ChatRole::User => "user",
                    ChatRole::Model => "model",
                };
                text_content(Some(role), &turn.text)
            })
            .collect();

        let generation_config = match &request.format {
            ResponseFormat::Text => None,
            ResponseFormat::Json(schema) => Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema.to_wire(),
            }),
        };

        Self {
            contents,
            system_instruction: request
                .system_instruction
                .as_deref()
                .map(|text| text_content(None, text)),
            generation_config,
        }
    }
}

impl GenerateContentResponse {
    /// Joined text parts of the first candidate. No candidate means no text.
    fn into_text(self) -> String {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            tracing::warn!("Prompt was blocked by the service: {}", reason);
        }
        let Some(candidate) = self.candidates.into_iter().next() else {
            return String::new();
        };
        if let Some(reason) = candidate.finish_reason.as_deref() {
            if reason != "STOP" {
                tracing::debug!("Candidate finished with reason {}", reason);
            }
        }
        candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[derive(Clone)]
pub struct GeminiService {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for GeminiService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiService")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GeminiService {
    pub fn new<S: AdvisorSettings + ?Sized>(settings: &S) -> Result<Self> {
        let client = Client::builder().timeout(settings.request_timeout()).build()?;
        Ok(Self {
            client,
            base_url: settings.base_url().trim_end_matches('/').to_string(),
            api_key: settings.api_key().to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl GenerativeService for GeminiService {
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let url = self.endpoint(&request.model);
        let body = GenerateContentRequest::from(&request);

        tracing::debug!("Making generateContent request to: {}", url);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Service response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::ServiceStatusError {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&raw).map_err(|e| {
            AdvisorError::malformed(format!("unexpected generateContent body: {}", e))
        })?;

        Ok(parsed.into_text())
    }
}

impl AdvisoryClient<GeminiService> {
    /// Client talking to Gemini with the given settings.
    pub fn from_settings<S: AdvisorSettings + ?Sized>(settings: &S) -> Result<Self> {
        Ok(AdvisoryClient::new(GeminiService::new(settings)?, settings))
    }
}
