#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::{ Arc, Mutex };

use llm_gateway::config::ModelConfig;
use llm_gateway::error::StorageError;
use llm_gateway::llm::completion::CompletionGateway;
use llm_gateway::llm::{
    AiProvider,
    ChatCompletion,
    ChatCompletionRequest,
    GeneratedImage,
    ImageGenerationRequest,
    ProviderError,
    SpeechSynthesisRequest,
    TranscriptionRequest,
};
use llm_gateway::storage::{ StorageBackend, StorageGateway, UploadOptions };

/// Scripted provider that records every request it receives.
#[derive(Default)]
pub struct MockProvider {
    pub chat_response: Mutex<Option<Result<ChatCompletion, String>>>,
    pub speech_response: Mutex<Option<Result<Vec<u8>, String>>>,
    pub transcription_response: Mutex<Option<Result<String, String>>>,
    pub image_response: Mutex<Option<Result<Vec<GeneratedImage>, String>>>,
    pub chat_requests: Mutex<Vec<ChatCompletionRequest>>,
    pub speech_requests: Mutex<Vec<SpeechSynthesisRequest>>,
    pub transcription_requests: Mutex<Vec<TranscriptionRequest>>,
    pub image_requests: Mutex<Vec<ImageGenerationRequest>>,
}

fn scripted<T: Clone>(slot: &Mutex<Option<Result<T, String>>>) -> Result<T, ProviderError> {
    match slot.lock().unwrap().clone() {
        Some(Ok(value)) => Ok(value),
        Some(Err(body)) => Err(ProviderError::Status { status: 500, body }),
        None => Err(ProviderError::Config("no scripted response".to_string())),
    }
}

impl MockProvider {
    pub fn with_chat(content: Option<&str>) -> Self {
        let provider = Self::default();
        *provider.chat_response.lock().unwrap() = Some(
            Ok(ChatCompletion { choices: vec![content.map(str::to_string)] })
        );
        provider
    }

    pub fn with_speech(audio: &[u8]) -> Self {
        let provider = Self::default();
        *provider.speech_response.lock().unwrap() = Some(Ok(audio.to_vec()));
        provider
    }

    pub fn with_images(images: Vec<GeneratedImage>) -> Self {
        let provider = Self::default();
        *provider.image_response.lock().unwrap() = Some(Ok(images));
        provider
    }

    pub fn failing() -> Self {
        let provider = Self::default();
        *provider.chat_response.lock().unwrap() = Some(Err("upstream exploded".to_string()));
        *provider.speech_response.lock().unwrap() = Some(Err("upstream exploded".to_string()));
        *provider.transcription_response.lock().unwrap() = Some(Err("upstream exploded".to_string()));
        *provider.image_response.lock().unwrap() = Some(Err("upstream exploded".to_string()));
        provider
    }
}

#[async_trait]
impl AiProvider for MockProvider {
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest
    ) -> Result<ChatCompletion, ProviderError> {
        self.chat_requests.lock().unwrap().push(request);
        scripted(&self.chat_response)
    }

    async fn create_speech(&self, request: SpeechSynthesisRequest) -> Result<Vec<u8>, ProviderError> {
        self.speech_requests.lock().unwrap().push(request);
        scripted(&self.speech_response)
    }

    async fn create_transcription(
        &self,
        request: TranscriptionRequest
    ) -> Result<String, ProviderError> {
        self.transcription_requests.lock().unwrap().push(request);
        scripted(&self.transcription_response)
    }

    async fn generate_images(
        &self,
        request: ImageGenerationRequest
    ) -> Result<Vec<GeneratedImage>, ProviderError> {
        self.image_requests.lock().unwrap().push(request);
        scripted(&self.image_response)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub bucket: String,
    pub path: String,
    pub bytes: Vec<u8>,
    pub options: UploadOptions,
}

/// In-memory storage backend with switchable failures.
#[derive(Default)]
pub struct MockStorage {
    pub fail_upload: bool,
    pub fail_tables: bool,
    pub fail_public_url: bool,
    pub rows: Mutex<Vec<JsonValue>>,
    pub inserted_batches: Mutex<Vec<Vec<JsonValue>>>,
    pub uploads: Mutex<Vec<Upload>>,
    pub url_lookups: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl StorageBackend for MockStorage {
    async fn select_all(&self, _table: &str) -> Result<Vec<JsonValue>, StorageError> {
        if self.fail_tables {
            return Err(StorageError::new("relation does not exist"));
        }
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn insert(&self, _table: &str, rows: Vec<JsonValue>) -> Result<Vec<JsonValue>, StorageError> {
        if self.fail_tables {
            return Err(StorageError::new("permission denied"));
        }
        self.inserted_batches.lock().unwrap().push(rows.clone());
        self.rows.lock().unwrap().extend(rows.iter().cloned());
        Ok(rows)
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        options: UploadOptions
    ) -> Result<(), StorageError> {
        if self.fail_upload {
            return Err(StorageError::new("storage offline"));
        }
        self.uploads.lock().unwrap().push(Upload {
            bucket: bucket.to_string(),
            path: path.to_string(),
            bytes,
            options,
        });
        Ok(())
    }

    async fn public_url(&self, bucket: &str, path: &str) -> Result<String, StorageError> {
        self.url_lookups.lock().unwrap().push((bucket.to_string(), path.to_string()));
        if self.fail_public_url {
            return Err(StorageError::new(format!("Invalid object path in bucket '{}'", bucket)));
        }
        Ok(format!("https://storage.test/public/{}/{}", bucket, path))
    }
}

pub fn gateway(provider: Arc<MockProvider>, storage: Arc<MockStorage>) -> CompletionGateway {
    CompletionGateway::new(provider, StorageGateway::new(storage), ModelConfig::default())
}
