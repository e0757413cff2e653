//! Toolbelt CLI entry point.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use toolbelt::cli::{commands, Cli, Commands};
use toolbelt::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let mut settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("toolbelt={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Execute command
    match &cli.command {
        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, config_path, settings)?;
        }

        Commands::Run { json } => {
            commands::run_json(json, settings).await?;
        }

        other => {
            if let Commands::Ask { model: Some(model), .. } = other {
                settings.openai.model = model.clone();
            }
            if let Some(command) = other.to_command() {
                commands::run_command(command, settings).await?;
            }
        }
    }

    Ok(())
}
