use crate::cli::Args;
use crate::error::ConfigError;
use url::Url;

/// Model and voice selection for each provider operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub chat_model: String,
    pub vision_model: String,
    pub speech_model: String,
    pub speech_voice: String,
    pub transcription_model: String,
    pub image_model: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            chat_model: "gpt-3.5-turbo".to_string(),
            vision_model: "gpt-4o".to_string(),
            speech_model: "tts-1-hd".to_string(),
            speech_voice: "alloy".to_string(),
            transcription_model: "whisper-1".to_string(),
            image_model: "dall-e-3".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub models: ModelConfig,
}

impl OpenAiConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        if args.openai_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Url::parse(&args.openai_base_url)
            .map_err(|source| ConfigError::InvalidUrl { name: "OPENAI_BASE_URL", source })?;

        Ok(Self {
            api_key: args.openai_api_key.clone(),
            base_url: args.openai_base_url.clone(),
            models: ModelConfig {
                chat_model: args.chat_model.clone(),
                vision_model: args.vision_model.clone(),
                speech_model: args.speech_model.clone(),
                speech_voice: args.speech_voice.clone(),
                transcription_model: args.transcription_model.clone(),
                image_model: args.image_model.clone(),
            },
        })
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub url: String,
    pub key: String,
}

impl StorageConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let url = args.supabase_url.as_deref().map(str::trim).unwrap_or_default();
        let key = args.supabase_key.as_deref().map(str::trim).unwrap_or_default();
        if url.is_empty() || key.is_empty() {
            return Err(ConfigError::MissingStorageConfig);
        }
        Url::parse(url).map_err(|source| ConfigError::InvalidUrl { name: "SUPABASE_URL", source })?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            key: key.to_string(),
        })
    }
}
