use crate::core::schema::ResponseSchema;
use crate::domain::model::ChatRole;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// One turn of the conversation sent to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: ChatRole,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    Text,
    Json(ResponseSchema),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub system_instruction: Option<String>,
    pub contents: Vec<Turn>,
    pub format: ResponseFormat,
}

impl GenerationRequest {
    /// Single-prompt free text request.
    pub fn text(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_instruction: None,
            contents: vec![Turn::user(prompt)],
            format: ResponseFormat::Text,
        }
    }

    /// Single-prompt request whose reply must follow `schema`.
    pub fn structured(
        model: impl Into<String>,
        prompt: impl Into<String>,
        schema: ResponseSchema,
    ) -> Self {
        Self {
            model: model.into(),
            system_instruction: None,
            contents: vec![Turn::user(prompt)],
            format: ResponseFormat::Json(schema),
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn is_structured(&self) -> bool {
        matches!(self.format, ResponseFormat::Json(_))
    }
}

/// An external text-generation backend. Implementations keep no conversation
/// state between calls; everything the model needs travels in the request.
#[async_trait]
pub trait GenerativeService: Send + Sync {
    /// Returns the raw reply text. An empty string means the service answered
    /// with no content.
    async fn generate(&self, request: GenerationRequest) -> Result<String>;
}

pub trait AdvisorSettings: Send + Sync {
    fn base_url(&self) -> &str;
    fn api_key(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    /// Model used for quick prose and structured replies.
    fn fast_model(&self) -> &str;
    /// Model used for long-form planning.
    fn deep_model(&self) -> &str;
}
