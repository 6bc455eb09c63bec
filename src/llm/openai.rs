use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, Response, header::{ HeaderMap, HeaderValue, AUTHORIZATION } };
use reqwest::multipart::{ Form, Part };
use serde::{ Deserialize, Serialize };

use super::{
    AiProvider,
    ChatCompletion,
    ChatCompletionRequest,
    ChatMessage,
    GeneratedImage,
    ImageGenerationRequest,
    ProviderError,
    SpeechSynthesisRequest,
    TranscriptionRequest,
};
use crate::config::OpenAiConfig;

pub struct OpenAIProvider {
    http: HttpClient,
    base_url: String,
}

#[derive(Serialize)]
struct OpenAIChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[derive(Serialize)]
struct OpenAISpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
}

#[derive(Deserialize)]
struct OpenAITranscriptionResponse {
    text: String,
}

#[derive(Serialize)]
struct OpenAIImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    response_format: &'a str,
}

#[derive(Deserialize)]
struct OpenAIImageResponse {
    #[serde(default)]
    data: Vec<OpenAIImageData>,
}

#[derive(Deserialize)]
struct OpenAIImageData {
    url: Option<String>,
}

impl OpenAIProvider {
    pub fn new(api_key: &str, base_url: &str) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| ProviderError::Config(format!("Invalid API key format: {}", e)))?
        );

        let http = HttpClient::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &OpenAiConfig) -> Result<Self, ProviderError> {
        Self::new(&config.api_key, &config.base_url)
    }

    fn endpoint(&self, route: &str) -> String {
        format!("{}/{}", self.base_url, route)
    }

    async fn check_status(resp: Response) -> Result<Response, ProviderError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ProviderError::Status { status: status.as_u16(), body })
    }
}

#[async_trait]
impl AiProvider for OpenAIProvider {
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest
    ) -> Result<ChatCompletion, ProviderError> {
        let url = self.endpoint("chat/completions");
        let req = OpenAIChatRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };
        debug!("POST {} ({} messages)", url, request.messages.len());

        let resp = self.http.post(&url).json(&req).send().await?;
        let resp = Self::check_status(resp).await?.json::<OpenAIResponse>().await?;

        Ok(ChatCompletion {
            choices: resp.choices
                .into_iter()
                .map(|choice| choice.message.content)
                .collect(),
        })
    }

    async fn create_speech(&self, request: SpeechSynthesisRequest) -> Result<Vec<u8>, ProviderError> {
        let url = self.endpoint("audio/speech");
        let req = OpenAISpeechRequest {
            model: &request.model,
            input: &request.input,
            voice: &request.voice,
        };
        debug!("POST {} ({} chars)", url, request.input.len());

        let resp = self.http.post(&url).json(&req).send().await?;
        let audio = Self::check_status(resp).await?.bytes().await?;
        Ok(audio.to_vec())
    }

    async fn create_transcription(
        &self,
        request: TranscriptionRequest
    ) -> Result<String, ProviderError> {
        let url = self.endpoint("audio/transcriptions");
        let file = Part::bytes(request.audio)
            .file_name(request.file_name)
            .mime_str(&request.mime_type)?;
        let form = Form::new()
            .part("file", file)
            .text("model", request.model)
            .text("language", request.language)
            .text("response_format", "json");
        debug!("POST {}", url);

        let resp = self.http.post(&url).multipart(form).send().await?;
        let resp = Self::check_status(resp).await?
            .json::<OpenAITranscriptionResponse>().await?;
        Ok(resp.text)
    }

    async fn generate_images(
        &self,
        request: ImageGenerationRequest
    ) -> Result<Vec<GeneratedImage>, ProviderError> {
        let url = self.endpoint("images/generations");
        let req = OpenAIImageRequest {
            model: &request.model,
            prompt: &request.prompt,
            n: 1,
            response_format: "url",
        };
        debug!("POST {}", url);

        let resp = self.http.post(&url).json(&req).send().await?;
        let resp = Self::check_status(resp).await?.json::<OpenAIImageResponse>().await?;

        Ok(resp.data
            .into_iter()
            .map(|image| GeneratedImage { url: image.url })
            .collect())
    }
}
