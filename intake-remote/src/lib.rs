//! HTTP implementations of the submission ports.
//!
//! [`SupabaseStorage`] uploads documents to a Supabase Storage bucket and
//! [`HttpWebhook`] posts the final JSON payload.

mod config;
mod storage;
mod webhook;

pub use config::{RemoteConfigError, StorageConfig, WebhookConfig};
pub use storage::SupabaseStorage;
pub use webhook::HttpWebhook;
