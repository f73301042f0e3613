use std::path::Path;

use anyhow::{Context, Result};
use intake_core::store::StoreConfig;
use intake_remote::{StorageConfig, WebhookConfig};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "intake.toml";
pub const STORAGE_KEY_ENV: &str = "INTAKE_STORAGE_KEY";
pub const WEBHOOK_URL_ENV: &str = "INTAKE_WEBHOOK_URL";

/// Contents of `intake.toml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub webhook: WebhookConfig,
    pub snapshot: StoreConfig,
}

impl AppConfig {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Reads `path`, or returns the defaults when the file does not exist.
    /// Environment overrides are applied either way.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            Self::parse(&raw)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Replaces secrets and endpoints from the environment. `lookup` is
    /// `std::env::var` outside of tests.
    pub fn apply_overrides<F>(
        &mut self,
        lookup: F,
    ) where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(STORAGE_KEY_ENV).filter(|v| !v.is_empty()) {
            self.storage.anon_key = key;
        }
        if let Some(url) = lookup(WEBHOOK_URL_ENV).filter(|v| !v.is_empty()) {
            self.webhook.url = url;
        }
    }
}
