use std::time::Duration;

use async_trait::async_trait;
use intake_core::{TransportError, WebhookSink};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::{RemoteConfigError, WebhookConfig};

/// Posts the submission payload as JSON. No retries.
pub struct HttpWebhook {
    client: reqwest::Client,
    url: Url,
}

impl HttpWebhook {
    pub fn new(config: &WebhookConfig) -> Result<Self, RemoteConfigError> {
        let url = config.validated_url()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl WebhookSink for HttpWebhook {
    async fn deliver(&self, payload: &Value) -> Result<(), TransportError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(url = %self.url, status = status.as_u16(), "webhook rejected payload");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(url = %self.url, status = status.as_u16(), "webhook accepted payload");
        Ok(())
    }
}
