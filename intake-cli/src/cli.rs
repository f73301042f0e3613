use std::path::PathBuf;

use clap::{Parser, Subcommand};
use intake_core::template::PARCEL_TEMPLATE_FILE_NAME;

use crate::config::DEFAULT_CONFIG_FILE;

/// Loan application intake for real-estate investors.
///
/// Each invocation resumes the saved application, applies one action and
/// saves it again.
#[derive(Parser, Debug)]
#[command(name = "intake", version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Log level or EnvFilter directive (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Append log records to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Do not write log records to the console
    #[arg(short, long, global = true, default_value_t = false)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Choose the transaction type (double_close, emd, fix_flip, buy_hold,
    /// gap_funding, land)
    Start { deal_type: String },

    /// Edit one field, e.g. `set purchasePrice 250,000.00` or
    /// `set comparables[0].address "12 Elm St"`
    Set { field: String, value: String },

    /// Attach a document to a file field
    Attach { field: String, path: PathBuf },

    /// Remove the document from a file field
    Detach { field: String },

    /// Validate the current step and move forward
    Next,

    /// Return to the previous step
    Back,

    /// Show the current step, field values and errors
    Status {
        /// Print the saved form as JSON instead
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Upload documents and send the application
    Submit,

    /// Discard the current application
    Reset,

    /// Write the multi-parcel CSV template
    Template {
        #[arg(default_value = PARCEL_TEMPLATE_FILE_NAME)]
        path: PathBuf,
    },
}
