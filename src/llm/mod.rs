pub mod completion;
pub mod openai;

use async_trait::async_trait;
use serde::{ Deserialize, Serialize };
use std::sync::Arc;
use thiserror::Error;

use crate::config::OpenAiConfig;
use self::openai::OpenAIProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageDetail {
    Low,
    High,
    Auto,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ImageUrl {
    pub url: String,
    pub detail: ImageDetail,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// A role-tagged message as sent to the chat completion endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn text(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: MessageContent::Text(content.into()) }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::text(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(Role::Assistant, content)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatCompletion {
    /// Content of each returned choice, in provider order.
    pub choices: Vec<Option<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechSynthesisRequest {
    pub model: String,
    pub voice: String,
    pub input: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionRequest {
    pub model: String,
    pub language: String,
    pub file_name: String,
    pub mime_type: String,
    pub audio: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedImage {
    pub url: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Status {
        status: u16,
        body: String,
    },

    #[error("invalid provider configuration: {0}")]
    Config(String),
}

/// The generative-AI operations the completion gateway relies on.
#[async_trait]
pub trait AiProvider: Send + Sync {
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest
    ) -> Result<ChatCompletion, ProviderError>;

    /// Returns the raw encoded audio.
    async fn create_speech(&self, request: SpeechSynthesisRequest) -> Result<Vec<u8>, ProviderError>;

    async fn create_transcription(
        &self,
        request: TranscriptionRequest
    ) -> Result<String, ProviderError>;

    async fn generate_images(
        &self,
        request: ImageGenerationRequest
    ) -> Result<Vec<GeneratedImage>, ProviderError>;
}

pub fn new_provider(config: &OpenAiConfig) -> Result<Arc<dyn AiProvider>, ProviderError> {
    let provider = OpenAIProvider::from_config(config)?;
    Ok(Arc::new(provider))
}
