use async_trait::async_trait;
use reqwest::{ Client as HttpClient, Response, header::{ HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE } };
use serde_json::Value as JsonValue;
use url::Url;

use super::{ StorageBackend, UploadOptions };
use crate::config::StorageConfig;
use crate::error::StorageError;

/// Storage backend speaking the Supabase REST (PostgREST) and Storage APIs.
pub struct SupabaseStorage {
    http: HttpClient,
    base_url: Url,
}

/// Appends `segments` to `base`, percent-encoding each one. Object paths are
/// passed already split on `/`.
pub fn endpoint<'a, I>(base: &Url, segments: I) -> Result<Url, StorageError>
    where I: IntoIterator<Item = &'a str>
{
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| StorageError::new(format!("Supabase URL '{}' cannot be a base", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Public objects are served from a fixed path; no request is needed.
pub fn public_object_url(base: &Url, bucket: &str, path: &str) -> Result<String, StorageError> {
    if bucket.is_empty() || path.is_empty() {
        return Err(StorageError::new("Bucket and object path are required for a public URL"));
    }
    let segments = ["storage", "v1", "object", "public", bucket].into_iter().chain(path.split('/'));
    Ok(endpoint(base, segments)?.to_string())
}

impl SupabaseStorage {
    pub fn new(base_url: &str, key: &str) -> Result<Self, StorageError> {
        let base_url = Url::parse(base_url).map_err(|e|
            StorageError::new(format!("Invalid Supabase URL '{}': {}", base_url, e))
        )?;

        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(key).map_err(|e|
            StorageError::new(format!("Invalid Supabase key format: {}", e))
        )?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", key)).map_err(|e|
            StorageError::new(format!("Invalid Supabase key format: {}", e))
        )?;
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let http = HttpClient::builder().default_headers(headers).build()?;

        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        Self::new(&config.url, &config.key)
    }

    fn table_url(&self, table: &str) -> Result<Url, StorageError> {
        endpoint(&self.base_url, ["rest", "v1", table])
    }

    async fn check_status(resp: Response) -> Result<Response, StorageError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(StorageError::new(error_message(status.as_u16(), &body)))
    }
}

/// Supabase reports errors as JSON with a `message` (PostgREST, Storage) or
/// `error` field; fall back to the raw body.
fn error_message(status: u16, body: &str) -> String {
    let parsed = serde_json::from_str::<JsonValue>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|v| v.get("message").or_else(|| v.get("error")))
        .and_then(|m| m.as_str())
        .map(|m| m.to_string());

    match message {
        Some(m) => format!("{} (status {})", m, status),
        None if body.is_empty() => format!("status {}", status),
        None => format!("{} (status {})", body, status),
    }
}

#[async_trait]
impl StorageBackend for SupabaseStorage {
    async fn select_all(&self, table: &str) -> Result<Vec<JsonValue>, StorageError> {
        let url = self.table_url(table)?;
        let resp = self.http.get(url).query(&[("select", "*")]).send().await?;
        let rows = Self::check_status(resp).await?.json::<Vec<JsonValue>>().await?;
        Ok(rows)
    }

    async fn insert(&self, table: &str, rows: Vec<JsonValue>) -> Result<Vec<JsonValue>, StorageError> {
        let url = self.table_url(table)?;
        let resp = self.http
            .post(url)
            .header("Prefer", "return=representation")
            .json(&rows)
            .send().await?;
        let inserted = Self::check_status(resp).await?.json::<Vec<JsonValue>>().await?;
        Ok(inserted)
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        options: UploadOptions
    ) -> Result<(), StorageError> {
        let segments = ["storage", "v1", "object", bucket].into_iter().chain(path.split('/'));
        let url = endpoint(&self.base_url, segments)?;
        let resp = self.http
            .post(url)
            .header(CONTENT_TYPE, options.content_type)
            .header("x-upsert", if options.upsert { "true" } else { "false" })
            .header("cache-control", "max-age=3600")
            .body(bytes)
            .send().await?;
        Self::check_status(resp).await?;
        Ok(())
    }

    async fn public_url(&self, bucket: &str, path: &str) -> Result<String, StorageError> {
        public_object_url(&self.base_url, bucket, path)
    }
}
