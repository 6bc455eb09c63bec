use serde::{ Deserialize, Serialize };
use url::Url;

use super::{ Validate, ValidationError };

/// One entry of a conversation history, oldest first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversationTurn {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<bool>,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self { text: text.into(), ai: Some(false) }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self { text: text.into(), ai: Some(true) }
    }

    pub fn is_from_assistant(&self) -> bool {
        self.ai.unwrap_or(false)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatRequest {
    pub prompt: String,
    pub messages: Vec<ConversationTurn>,
}

impl Validate for ChatRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VisionRequest {
    pub text: String,
    pub url: String,
}

const IMAGE_URL_SCHEMES: [&str; 3] = ["http", "https", "data"];

impl Validate for VisionRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let parsed = Url::parse(&self.url).map_err(|e|
            ValidationError(format!("url must be a valid URL: {}", e))
        )?;
        if !IMAGE_URL_SCHEMES.contains(&parsed.scheme()) {
            return Err(
                ValidationError(format!("url scheme '{}' is not supported", parsed.scheme()))
            );
        }
        if parsed.scheme() != "data" && parsed.host_str().is_none() {
            return Err(ValidationError("url must include a host".to_string()));
        }
        Ok(())
    }
}
