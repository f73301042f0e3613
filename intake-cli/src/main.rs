use std::io;

use clap::Parser;
use tracing::debug;

use intake_cli::cli::{Cli, Commands};
use intake_cli::commands::{execute, open_session, write_template};
use intake_cli::config::AppConfig;
use intake_cli::logging::{LogOptions, init_logging};

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&LogOptions {
        level: cli.log_level.as_deref(),
        quiet: cli.quiet,
        file: cli.log_file.as_deref(),
    })?;

    // The template needs neither configuration nor a saved form.
    if let Commands::Template { path } = &cli.command {
        write_template(path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let config = AppConfig::load(&cli.config)?;
    debug!(backend = %config.snapshot.backend, "configuration loaded");

    let mut session = open_session(&config.snapshot).await?;
    execute(&cli.command, &config, &mut session, &mut io::stdout().lock()).await
}
