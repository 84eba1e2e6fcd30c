//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod model;
mod pipeline;
mod schema;
mod transform;

pub use model::ModelCommands;
pub use pipeline::PipelineCommands;
pub use schema::SchemaCommands;
pub use transform::TransformCommands;

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use lagwatch_client::RawResponse;
use std::io::Write;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Pipeline operations
    Pipeline {
        #[command(subcommand)]
        command: PipelineCommands,
    },
    /// Model operations
    Model {
        #[command(subcommand)]
        command: ModelCommands,
    },
    /// Warehouse schema maintenance
    Schema {
        #[command(subcommand)]
        command: SchemaCommands,
    },
    /// Streaming record transforms
    Transform {
        #[command(subcommand)]
        command: TransformCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Pipeline { command } => pipeline::handle_pipeline_command(command, config).await,
        Commands::Model { command } => model::handle_model_command(command, config).await,
        Commands::Schema { command } => schema::handle_schema_command(command, config).await,
        Commands::Transform { command } => transform::handle_transform_command(command),
    }
}

const SEPARATOR_WIDTH: usize = 40;

/// Writes one bulk-operation result: status and body verbatim, then a separator
fn write_raw_result<W: Write>(
    out: &mut W,
    label: &str,
    result: &lagwatch_client::Result<RawResponse>,
) -> std::io::Result<()> {
    writeln!(out, "{}", label.bold())?;
    match result {
        Ok(response) => {
            let status = if response.is_success() {
                response.status.to_string().green()
            } else {
                response.status.to_string().red()
            };
            writeln!(out, "Status Code: {}", status)?;
            writeln!(out, "Response: {}", response.body)?;
        }
        Err(e) => writeln!(out, "{} {}", "Error:".red(), e)?,
    }
    writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))
}
