use crate::error::GatewayError;
use crate::llm::completion::CompletionGateway;
use crate::models::Validate;
use crate::models::chat::{ ChatRequest, VisionRequest };
use crate::models::media::{ ImageRequest, SpeechRequest };
use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    Json,
    extract::{ FromRequest, Request, State, rejection::JsonRejection },
    response::{ IntoResponse, Response },
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use log::{ debug, warn };

/// Error body in the `{statusCode, message, error}` shape clients expect.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: msg.into() }
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self { status: StatusCode::SERVICE_UNAVAILABLE, message: msg.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(
            json!({
                "statusCode": self.status.as_u16(),
                "message": self.message,
                "error": self.status.canonical_reason().unwrap_or("Error"),
            })
        );
        (self.status, body).into_response()
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError::service_unavailable(err.summary())
    }
}

/// JSON body extractor that also runs [`Validate`]; anything malformed is
/// rejected with 400 before a handler runs.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
    where T: DeserializeOwned + Validate, S: Send + Sync
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await
            .map_err(|rejection: JsonRejection| {
                warn!("Rejected request body: {}", rejection.body_text());
                ApiError::bad_request(rejection.body_text())
            })?;
        value.validate().map_err(|e| {
            warn!("Request failed validation: {}", e);
            ApiError::bad_request(e.to_string())
        })?;
        Ok(ValidatedJson(value))
    }
}

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<CompletionGateway>,
}

pub fn build_router(gateway: Arc<CompletionGateway>) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/speech", post(speech_handler))
        .route("/vision", post(vision_handler))
        .route("/image", post(image_handler))
        .route("/health", get(health_handler))
        .with_state(AppState { gateway })
}

async fn chat_handler(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ChatRequest>
) -> Result<String, ApiError> {
    debug!("chat request with {} history turns", req.messages.len());
    Ok(state.gateway.chat_completion(&req.prompt, &req.messages).await?)
}

async fn speech_handler(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SpeechRequest>
) -> Result<String, ApiError> {
    debug!("speech request for user {}", req.user_id);
    Ok(state.gateway.synthesize_speech(req.user_id, &req.text).await?)
}

async fn vision_handler(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<VisionRequest>
) -> Result<String, ApiError> {
    Ok(state.gateway.vision_completion(&req.text, &req.url).await?)
}

async fn image_handler(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ImageRequest>
) -> Result<String, ApiError> {
    Ok(state.gateway.generate_image(&req.prompt).await?)
}

async fn health_handler() -> &'static str {
    "ok"
}
