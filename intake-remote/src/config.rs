use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BUCKET: &str = "documents";
pub const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum RemoteConfigError {
    #[error("invalid {field} '{value}': {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{0} is not configured")]
    Missing(&'static str),

    #[error("failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// `[storage]` section: where documents are uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    #[serde(default)]
    pub base_url: String,
    /// Sent both as the bearer token and the `apikey` header.
    #[serde(default)]
    pub anon_key: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            anon_key: String::new(),
            bucket: default_bucket(),
        }
    }
}

impl StorageConfig {
    /// Base URL without a trailing slash, checked to be an absolute URL.
    pub(crate) fn validated_base_url(&self) -> Result<String, RemoteConfigError> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(RemoteConfigError::Missing("storage.base_url"));
        }
        if self.anon_key.trim().is_empty() {
            return Err(RemoteConfigError::Missing("storage.anon_key"));
        }
        Url::parse(trimmed).map_err(|source| RemoteConfigError::InvalidUrl {
            field: "storage.base_url",
            value: self.base_url.clone(),
            source,
        })?;
        Ok(trimmed.to_string())
    }
}

/// `[webhook]` section: where the payload is posted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl WebhookConfig {
    pub(crate) fn validated_url(&self) -> Result<Url, RemoteConfigError> {
        let raw = self.url.trim();
        if raw.is_empty() {
            return Err(RemoteConfigError::Missing("webhook.url"));
        }
        Url::parse(raw).map_err(|source| RemoteConfigError::InvalidUrl {
            field: "webhook.url",
            value: self.url.clone(),
            source,
        })
    }
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_WEBHOOK_TIMEOUT_SECS
}
