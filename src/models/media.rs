use serde::{ Deserialize, Serialize };

use super::{ require_non_empty, Validate, ValidationError };

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct SpeechRequest {
    pub user_id: i64,
    pub text: String,
}

impl Validate for SpeechRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("text", &self.text)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageRequest {
    pub prompt: String,
}

impl Validate for ImageRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// An audio file written to the object store by speech synthesis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoredAudioObject {
    pub owner_id: i64,
    pub name: String,
    pub bucket: String,
}
