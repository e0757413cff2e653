//! Execution of toolbelt commands from the CLI.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::command::{Command, Dispatcher};
use crate::config::Settings;
use anyhow::{Context, Result};
use std::io::Read;

/// Run one toolbelt command and print its result.
pub async fn run_command(command: Command, settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::for_command(&command), &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'toolbelt doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let dispatcher = Dispatcher::from_settings(&settings)?;

    // The typewriter draws on the terminal itself.
    let spinner = match command {
        Command::TypeMessage { .. } => None,
        _ => Some(Output::spinner(&format!("Running {}...", command.label()))),
    };

    let result = dispatcher.dispatch(&command).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match result {
        Ok(output) => {
            if !matches!(command, Command::TypeMessage { .. }) {
                println!("{}", output);
            }
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("{} failed: {}", command.label(), e));
            Err(e.into())
        }
    }
}

/// Parse a JSON command (or read it from stdin for `-`) and run it.
pub async fn run_json(json: &str, settings: Settings) -> Result<()> {
    let json = if json == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read command from stdin")?;
        buffer
    } else {
        json.to_string()
    };

    let command = Command::from_json(&json)?;
    run_command(command, settings).await
}
