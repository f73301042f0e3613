use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use intake_core::calculations::{format_currency_input, format_file_size};
use intake_core::store::{Snapshot, StoreConfig, StoreRegistry};
use intake_core::template::write_parcel_template;
use intake_core::wizard::is_currency_field;
use intake_core::{DealType, FieldInput, IntakeSession, SessionError, SubmissionPipeline};
use intake_remote::{HttpWebhook, SupabaseStorage};
use intake_store_sqlite::SqliteStoreFactory;
use tracing::debug;

use crate::cli::Commands;
use crate::config::AppConfig;

/// Every snapshot backend this binary knows about.
pub fn build_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::with_memory();
    registry.register(Box::new(SqliteStoreFactory));
    registry
}

/// Connects to the configured snapshot store and resumes any saved form.
pub async fn open_session(config: &StoreConfig) -> Result<IntakeSession> {
    debug!("opening {} snapshot store", config.backend);
    let store = build_registry()
        .create(config)
        .await
        .with_context(|| format!("Failed to open snapshot store: {}", config.connection_string))?;
    Ok(IntakeSession::open(store).await)
}

pub fn write_template(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create: {}", path.display()))?;
    write_parcel_template(file)
        .with_context(|| format!("Failed to write template: {}", path.display()))
}

/// Applies one command to `session`, writing what the user sees to `out`.
pub async fn execute<W: Write>(
    command: &Commands,
    config: &AppConfig,
    session: &mut IntakeSession,
    out: &mut W,
) -> Result<()> {
    match command {
        Commands::Start { deal_type } => {
            let deal_type = DealType::parse(deal_type).with_context(|| {
                let names: Vec<_> = DealType::ALL.iter().map(DealType::as_str).collect();
                format!(
                    "Unknown transaction type '{deal_type}'; expected one of: {}",
                    names.join(", ")
                )
            })?;
            session.select_deal_type(deal_type).await?;
            writeln!(out, "Transaction: {}", deal_type.label())?;
        }
        Commands::Set { field, value } => {
            session
                .set_field(field, FieldInput::text(value.as_str()))
                .await?;
            let shown = if is_currency_field(field) {
                format_currency_input(value)
            } else {
                String::new()
            };
            if shown.is_empty() {
                writeln!(out, "Saved {field}")?;
            } else {
                writeln!(out, "Saved {field}: {shown}")?;
            }
        }
        Commands::Attach { field, path } => {
            session.attach_file(field, path).await?;
            writeln!(
                out,
                "Attached {} to {field}",
                describe_file(path)
            )?;
        }
        Commands::Detach { field } => {
            session.detach_file(field).await?;
            writeln!(out, "Removed document from {field}")?;
        }
        Commands::Next => {
            let step = session.next().await?;
            writeln!(out, "{step}")?;
        }
        Commands::Back => {
            let step = session.back().await?;
            writeln!(out, "{step}")?;
        }
        Commands::Status { json } => {
            if *json {
                match Snapshot::capture(session.state())? {
                    Some(snapshot) => writeln!(out, "{}", serde_json::to_string_pretty(&snapshot)?)?,
                    None => writeln!(out, "null")?,
                }
            } else {
                write!(out, "{}", crate::render::render_status(session.state())?)?;
            }
        }
        Commands::Submit => {
            let has_documents = session
                .state()
                .deal()
                .is_some_and(|deal| !deal.files().is_empty());
            let storage = if has_documents {
                Some(
                    SupabaseStorage::new(&config.storage)
                        .context("Document storage is not configured")?,
                )
            } else {
                None
            };
            let webhook =
                HttpWebhook::new(&config.webhook).context("Webhook is not configured")?;
            let pipeline = SubmissionPipeline::new(storage, webhook);

            let receipt = session.submit(&pipeline).await.map_err(|e| match e {
                SessionError::Submission(e) => {
                    let notice = e.notice();
                    anyhow::Error::new(e).context(notice)
                }
                other => other.into(),
            })?;
            writeln!(out, "{}", receipt.confirmation)?;
        }
        Commands::Reset => {
            session.reset().await?;
            writeln!(out, "Started a new application.")?;
        }
        Commands::Template { path } => {
            write_template(path)?;
            writeln!(out, "Wrote {}", path.display())?;
        }
    }
    Ok(())
}

fn describe_file(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    match std::fs::metadata(path) {
        Ok(meta) => format!("{name} ({})", format_file_size(meta.len())),
        Err(_) => name,
    }
}
