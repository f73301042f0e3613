//! Delivery of a completed application.
//!
//! Documents are uploaded first, concurrently. The webhook payload is built
//! once every upload has returned its public URL, and posted last. Any
//! failure aborts the submission; documents already uploaded stay where
//! they are.

mod payload;
mod pipeline;

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::models::FileRef;

pub use payload::{build_payload, object_path, sanitize_file_name};
pub use pipeline::{SubmissionPipeline, SubmissionReceipt};

/// Shown to the user for every submission failure.
pub const GENERIC_FAILURE_NOTICE: &str = "Error submitting form. Please try again.";

/// Failure talking to an outside service.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("server responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("no transaction type selected")]
    NoDealType,

    #[error("upload of '{field}' failed: {source}")]
    Upload {
        field: String,
        #[source]
        source: TransportError,
    },

    #[error("webhook delivery failed: {0}")]
    Webhook(#[source] TransportError),

    #[error("cannot build payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl SubmissionError {
    /// The user-facing message. Details go to the log.
    pub fn notice(&self) -> &'static str {
        GENERIC_FAILURE_NOTICE
    }
}

/// Object storage for uploaded documents.
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Stores `file` at `object_path` and returns its public URL.
    async fn upload(&self, object_path: &str, file: &FileRef) -> Result<String, TransportError>;
}

/// `None` is storage that was never configured. A submission without
/// documents never reaches it.
#[async_trait]
impl<S: DocumentStorage> DocumentStorage for Option<S> {
    async fn upload(&self, object_path: &str, file: &FileRef) -> Result<String, TransportError> {
        match self {
            Some(storage) => storage.upload(object_path, file).await,
            None => Err(TransportError::Request(
                "document storage is not configured".to_string(),
            )),
        }
    }
}

/// Receiver of the final JSON payload.
#[async_trait]
pub trait WebhookSink: Send + Sync {
    /// Any non-success response is an error.
    async fn deliver(&self, payload: &Value) -> Result<(), TransportError>;
}
