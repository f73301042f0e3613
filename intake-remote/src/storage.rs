use async_trait::async_trait;
use intake_core::models::document::OCTET_STREAM;
use intake_core::{DocumentStorage, FileRef, TransportError};
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

use crate::config::{RemoteConfigError, StorageConfig};

/// Supabase Storage REST client.
///
/// Objects are written with
/// `POST {base}/storage/v1/object/{bucket}/{path}` and served from
/// `{base}/storage/v1/object/public/{bucket}/{path}`.
pub struct SupabaseStorage {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    bucket: String,
}

impl SupabaseStorage {
    pub fn new(config: &StorageConfig) -> Result<Self, RemoteConfigError> {
        let base_url = config.validated_base_url()?;
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url,
            anon_key: config.anon_key.trim().to_string(),
            bucket: config.bucket.clone(),
        })
    }

    pub fn upload_url(
        &self,
        object_path: &str,
    ) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, object_path
        )
    }

    pub fn public_url(
        &self,
        object_path: &str,
    ) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, object_path
        )
    }
}

#[async_trait]
impl DocumentStorage for SupabaseStorage {
    async fn upload(&self, object_path: &str, file: &FileRef) -> Result<String, TransportError> {
        let body = tokio::fs::read(&file.path)
            .await
            .map_err(|source| TransportError::Io {
                path: file.path.clone(),
                source,
            })?;
        let content_type = if file.mime_type.is_empty() {
            OCTET_STREAM
        } else {
            file.mime_type.as_str()
        };

        let response = self
            .client
            .post(self.upload_url(object_path))
            .bearer_auth(&self.anon_key)
            .header("apikey", &self.anon_key)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(object_path, status, "storage rejected upload: {}", body);
            return Err(TransportError::Status { status, body });
        }

        debug!(object_path, bytes = file.size, "upload stored");
        Ok(self.public_url(object_path))
    }
}
