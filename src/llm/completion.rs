use log::{ debug, error };
use std::fmt::Display;
use std::sync::Arc;

use super::{
    AiProvider,
    ChatCompletion,
    ChatCompletionRequest,
    ChatMessage,
    ContentPart,
    ImageDetail,
    ImageGenerationRequest,
    ImageUrl,
    MessageContent,
    Role,
    SpeechSynthesisRequest,
    TranscriptionRequest,
};
use crate::config::ModelConfig;
use crate::error::GatewayError;
use crate::models::chat::ConversationTurn;
use crate::storage::StorageGateway;

pub const TEMPERATURE: f32 = 0.5;
pub const MAX_TOKENS: u32 = 1000;

const TRANSCRIPTION_FILE_NAME: &str = "input.wav";
const TRANSCRIPTION_MIME_TYPE: &str = "audio/wav";

const CHAT_FAILED: &str = "Failed request to ChatGPT";
const VISION_FAILED: &str = "Unable to recognize image";
const SPEECH_FAILED: &str = "Failed to synthesize speech";
const TRANSCRIPTION_FAILED: &str = "Failed to transcribe audio";
const IMAGE_FAILED: &str = "Failed to generate image";

/// System prompt first, then one message per turn in the order given.
pub fn build_chat_messages(prompt: &str, history: &[ConversationTurn]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage::system(prompt));
    for turn in history {
        let role = if turn.is_from_assistant() { Role::Assistant } else { Role::User };
        messages.push(ChatMessage::text(role, turn.text.clone()));
    }
    messages
}

pub fn build_vision_message(text: &str, image_url: &str) -> ChatMessage {
    ChatMessage {
        role: Role::User,
        content: MessageContent::Parts(
            vec![
                ContentPart::Text { text: text.to_string() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.to_string(),
                        detail: ImageDetail::High,
                    },
                }
            ]
        ),
    }
}

// A missing choice or a choice without content is an empty answer, not an error.
fn first_choice_text(completion: ChatCompletion) -> String {
    completion.choices.into_iter().next().flatten().unwrap_or_default()
}

fn unavailable<E: Display>(summary: &'static str) -> impl FnOnce(E) -> GatewayError {
    move |e| {
        error!("{}: {}", summary, e);
        GatewayError::UpstreamUnavailable(summary.to_string())
    }
}

/// Text, vision, speech and image operations against the AI provider.
pub struct CompletionGateway {
    provider: Arc<dyn AiProvider>,
    storage: StorageGateway,
    models: ModelConfig,
}

impl CompletionGateway {
    pub fn new(provider: Arc<dyn AiProvider>, storage: StorageGateway, models: ModelConfig) -> Self {
        Self { provider, storage, models }
    }

    pub fn storage(&self) -> &StorageGateway {
        &self.storage
    }

    pub async fn chat_completion(
        &self,
        prompt: &str,
        history: &[ConversationTurn]
    ) -> Result<String, GatewayError> {
        let request = ChatCompletionRequest {
            model: self.models.chat_model.clone(),
            messages: build_chat_messages(prompt, history),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        let completion = self.provider
            .chat_completion(request).await
            .map_err(unavailable(CHAT_FAILED))?;

        Ok(first_choice_text(completion))
    }

    pub async fn vision_completion(
        &self,
        text: &str,
        image_url: &str
    ) -> Result<String, GatewayError> {
        let request = ChatCompletionRequest {
            model: self.models.vision_model.clone(),
            messages: vec![build_vision_message(text, image_url)],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        let completion = self.provider
            .chat_completion(request).await
            .map_err(unavailable(VISION_FAILED))?;

        Ok(first_choice_text(completion))
    }

    /// Synthesizes `text`, stores the audio under the owner's prefix and
    /// returns its public URL.
    pub async fn synthesize_speech(&self, owner_id: i64, text: &str) -> Result<String, GatewayError> {
        let request = SpeechSynthesisRequest {
            model: self.models.speech_model.clone(),
            voice: self.models.speech_voice.clone(),
            input: text.to_string(),
        };
        let audio = self.provider
            .create_speech(request).await
            .map_err(unavailable(SPEECH_FAILED))?;

        let stored = self.storage
            .upload_audio_object(owner_id, audio).await
            .map_err(storage_failure)?;
        debug!("Stored synthesized audio as {}/{}", stored.bucket, stored.name);

        self.storage
            .resolve_public_url(&stored.bucket, &stored.name).await
            .map_err(storage_failure)
    }

    pub async fn transcribe_audio(
        &self,
        audio: Vec<u8>,
        language: &str
    ) -> Result<String, GatewayError> {
        let request = TranscriptionRequest {
            model: self.models.transcription_model.clone(),
            language: language.to_string(),
            file_name: TRANSCRIPTION_FILE_NAME.to_string(),
            mime_type: TRANSCRIPTION_MIME_TYPE.to_string(),
            audio,
        };
        self.provider.create_transcription(request).await.map_err(unavailable(TRANSCRIPTION_FAILED))
    }

    pub async fn generate_image(&self, prompt: &str) -> Result<String, GatewayError> {
        let request = ImageGenerationRequest {
            model: self.models.image_model.clone(),
            prompt: prompt.to_string(),
        };
        let images = self.provider
            .generate_images(request).await
            .map_err(unavailable(IMAGE_FAILED))?;

        images
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| unavailable(IMAGE_FAILED)("Image URL is undefined"))
    }
}

fn storage_failure(e: crate::error::StorageError) -> GatewayError {
    error!("{}: {}", SPEECH_FAILED, e);
    GatewayError::Storage { summary: SPEECH_FAILED.to_string(), source: e }
}
