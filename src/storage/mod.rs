pub mod supabase;

use async_trait::async_trait;
use log::{ debug, error };
use serde_json::Value as JsonValue;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::models::media::StoredAudioObject;
use self::supabase::SupabaseStorage;

pub const AUDIO_BUCKET: &str = "audios";
pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";
const AUDIO_EXTENSION: &str = "mp3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub content_type: String,
    /// Overwrite an existing object with the same path.
    pub upsert: bool,
}

/// Table and object-store primitives of the storage backend.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn select_all(&self, table: &str) -> Result<Vec<JsonValue>, StorageError>;

    /// Inserts a batch of rows and returns the rows as stored.
    async fn insert(&self, table: &str, rows: Vec<JsonValue>) -> Result<Vec<JsonValue>, StorageError>;

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        options: UploadOptions
    ) -> Result<(), StorageError>;

    async fn public_url(&self, bucket: &str, path: &str) -> Result<String, StorageError>;
}

pub fn new_backend(config: &StorageConfig) -> Result<Arc<dyn StorageBackend>, StorageError> {
    let backend = SupabaseStorage::from_config(config)?;
    Ok(Arc::new(backend))
}

/// A fresh object path under the owner's prefix. Names are random so
/// concurrent uploads for one owner never collide.
pub fn audio_object_name(owner_id: i64) -> String {
    format!("{}/{}.{}", owner_id, Uuid::new_v4(), AUDIO_EXTENSION)
}

fn table_failure(context: &str, table: &str, e: StorageError) -> StorageError {
    error!("{} on table '{}': {}", context, table, e);
    StorageError::new(format!("{}: {}", context, e.message))
}

#[derive(Clone)]
pub struct StorageGateway {
    backend: Arc<dyn StorageBackend>,
}

impl StorageGateway {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub async fn list_rows(&self, table: &str) -> Result<Vec<JsonValue>, StorageError> {
        self.backend
            .select_all(table).await
            .map_err(|e| table_failure("Error fetching data from table", table, e))
    }

    pub async fn insert_row(
        &self,
        table: &str,
        record: JsonValue
    ) -> Result<Vec<JsonValue>, StorageError> {
        self.backend
            .insert(table, vec![record]).await
            .map_err(|e| table_failure("Insert error", table, e))
    }

    pub async fn upload_audio_object(
        &self,
        owner_id: i64,
        bytes: Vec<u8>
    ) -> Result<StoredAudioObject, StorageError> {
        let name = audio_object_name(owner_id);
        debug!("Uploading {} bytes to {}/{}", bytes.len(), AUDIO_BUCKET, name);

        let options = UploadOptions {
            content_type: AUDIO_CONTENT_TYPE.to_string(),
            upsert: true,
        };
        self.backend
            .upload(AUDIO_BUCKET, &name, bytes, options).await
            .map_err(|e| {
                error!("Audio upload to {}/{} failed: {}", AUDIO_BUCKET, name, e);
                StorageError::new(format!("Audio upload error: {}", e.message))
            })?;

        Ok(StoredAudioObject {
            owner_id,
            name,
            bucket: AUDIO_BUCKET.to_string(),
        })
    }

    pub async fn resolve_public_url(&self, bucket: &str, name: &str) -> Result<String, StorageError> {
        let url = self.backend.public_url(bucket, name).await?;
        if url.is_empty() {
            return Err(StorageError::new(format!("No public URL for {}/{}", bucket, name)));
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_name_is_scoped_to_owner() {
        let name = audio_object_name(42);
        assert!(name.starts_with("42/"));
        assert!(name.ends_with(".mp3"));
    }

    #[test]
    fn table_failure_keeps_backend_message() {
        let err = table_failure("Insert error", "notes", StorageError::new("permission denied"));
        assert_eq!(err.message, "Insert error: permission denied");
    }

    #[test]
    fn object_names_do_not_repeat() {
        assert_ne!(audio_object_name(7), audio_object_name(7));
    }
}
