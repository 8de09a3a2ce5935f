//! CLI command definitions and execution
//!
//! This module contains all CLI commands and their implementations.

use clap::{Parser, Subcommand};

use dk_core::ConfigManager;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod completions;
mod exists;
mod ls;
mod path;

/// dk - dataset-pipeline storage CLI
///
/// Resolves dataset parameters, prints batch dataset paths, and runs
/// read-side operations (listing, existence checks) against object storage.
#[derive(Parser, Debug)]
#[command(name = "dk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Role to assume for storage access (falls back to the configured role)
    #[arg(long, global = true)]
    pub role: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List objects under a storage URI
    Ls(ls::LsArgs),

    /// Check whether an object exists
    Exists(exists::ExistsArgs),

    /// Print the batch storage path of a dataset
    Path(path::PathArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        quiet: cli.quiet,
    };

    let role = match resolve_role(cli.role, &output_config) {
        Ok(role) => role,
        Err(code) => return code,
    };
    if let Some(role) = &role {
        tracing::debug!(role, "using assumed role for storage access");
    }

    match cli.command {
        Commands::Ls(args) => ls::execute(args, role, output_config).await,
        Commands::Exists(args) => exists::execute(args, role, output_config).await,
        Commands::Path(args) => path::execute(args, output_config),
        Commands::Completions(args) => completions::execute(args),
    }
}

/// The --role flag wins over the configured role_arn
fn resolve_role(
    flag: Option<String>,
    output_config: &OutputConfig,
) -> Result<Option<String>, ExitCode> {
    if flag.is_some() {
        return Ok(flag);
    }

    let manager = match ConfigManager::new() {
        Ok(manager) => manager,
        Err(e) => {
            Formatter::new(output_config.clone()).error(&format!("Failed to load config: {e}"));
            return Err(ExitCode::GeneralError);
        }
    };

    match manager.load() {
        Ok(config) => Ok(config.role_arn),
        Err(e) => {
            Formatter::new(output_config.clone()).error(&format!("Failed to load config: {e}"));
            Err(ExitCode::from_error(&e))
        }
    }
}
