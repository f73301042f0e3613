use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde_json::Value;
use tracing::{error, info};

use super::{DocumentStorage, SubmissionError, WebhookSink, build_payload, object_path};
use crate::wizard::FormState;

/// What a successful submission produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub payload: Value,
    /// Field name → public URL of each uploaded document.
    pub files: BTreeMap<String, String>,
    pub submitted_at: DateTime<Utc>,
    pub confirmation: &'static str,
}

/// Uploads documents, then posts the payload.
pub struct SubmissionPipeline<D, W> {
    storage: D,
    webhook: W,
}

impl<D, W> SubmissionPipeline<D, W>
where
    D: DocumentStorage,
    W: WebhookSink,
{
    pub fn new(
        storage: D,
        webhook: W,
    ) -> Self {
        Self { storage, webhook }
    }

    pub fn storage(&self) -> &D {
        &self.storage
    }

    pub fn webhook(&self) -> &W {
        &self.webhook
    }

    pub async fn run(
        &self,
        state: &FormState,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        self.run_at(state, Utc::now()).await
    }

    /// Runs the submission as of `submitted_at`.
    ///
    /// Upload `i` (in field order) is stored under the timestamp
    /// `submitted_at + i` milliseconds, so two documents with the same file
    /// name never share an object path.
    pub async fn run_at(
        &self,
        state: &FormState,
        submitted_at: DateTime<Utc>,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let deal = state.deal().ok_or(SubmissionError::NoDealType)?;
        let deal_type = deal.deal_type();
        let base_ms = submitted_at.timestamp_millis();

        let uploads = deal
            .files()
            .into_iter()
            .enumerate()
            .map(|(i, (field, file))| {
                let path = object_path(base_ms + i as i64, &file.name);
                async move {
                    info!(field, path = %path, size = file.size, "uploading document");
                    match self.storage.upload(&path, file).await {
                        Ok(url) => Ok((field.to_string(), url)),
                        Err(source) => {
                            error!(field, path = %path, "upload failed: {}", source);
                            Err(SubmissionError::Upload {
                                field: field.to_string(),
                                source,
                            })
                        }
                    }
                }
            });
        let files: BTreeMap<String, String> = try_join_all(uploads).await?.into_iter().collect();

        let payload = build_payload(state, &files, submitted_at)?;

        if let Err(e) = self.webhook.deliver(&payload).await {
            error!(%deal_type, "webhook delivery failed: {}", e);
            return Err(SubmissionError::Webhook(e));
        }

        info!(%deal_type, documents = files.len(), "application submitted");
        Ok(SubmissionReceipt {
            payload,
            files,
            submitted_at,
            confirmation: deal_type.confirmation_message(),
        })
    }
}
