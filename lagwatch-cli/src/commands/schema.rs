//! Schema command handlers
//!
//! Adds columns that exist in a relational source table but not in the
//! warehouse destination table. New columns get a placeholder type and are
//! nullable; existing destination columns are never altered.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use lagwatch_core::schema::{PLACEHOLDER_COLUMN_TYPE, missing_columns};
use tracing::info;

use crate::catalog;
use crate::config::Config;
use crate::warehouse::{DEFAULT_BIGQUERY_URL, TableRef, WarehouseClient};

/// Schema subcommands
#[derive(Subcommand)]
pub enum SchemaCommands {
    /// Add source columns missing from the destination table
    Sync {
        /// MySQL connection URL of the source database
        #[arg(long, env = "MYSQL_URL", hide_env_values = true)]
        mysql_url: String,

        /// Source table name
        #[arg(long)]
        source_table: String,

        /// Destination table as project.dataset.table
        #[arg(long)]
        destination: String,

        /// OAuth access token for the warehouse API
        #[arg(long, env = "BIGQUERY_ACCESS_TOKEN", hide_env_values = true)]
        access_token: String,

        /// Warehouse API root
        #[arg(long, env = "BIGQUERY_API_URL", default_value = DEFAULT_BIGQUERY_URL)]
        bigquery_url: String,

        /// Print the missing columns without patching the destination
        #[arg(long)]
        dry_run: bool,
    },
}

/// Handle schema commands
pub async fn handle_schema_command(command: SchemaCommands, config: &Config) -> Result<()> {
    match command {
        SchemaCommands::Sync {
            mysql_url,
            source_table,
            destination,
            access_token,
            bigquery_url,
            dry_run,
        } => {
            let destination = TableRef::parse(&destination)?;
            let warehouse = WarehouseClient::new(&bigquery_url, &access_token, config.timeout)?;

            let pool = catalog::create_pool(&mysql_url, config.timeout)
                .await
                .context("Failed to connect to source database")?;
            let source_columns = catalog::table_columns(&pool, &source_table)
                .await
                .with_context(|| format!("Failed to read columns of {}", source_table))?;
            pool.close().await;

            if source_columns.is_empty() {
                anyhow::bail!("Source table {} has no columns or does not exist", source_table);
            }

            sync_schema(&warehouse, &destination, &source_columns, dry_run).await
        }
    }
}

/// Patch `destination` with the columns of `source_columns` it lacks
async fn sync_schema(
    warehouse: &WarehouseClient,
    destination: &TableRef,
    source_columns: &[String],
    dry_run: bool,
) -> Result<()> {
    let schema = warehouse
        .get_schema(destination)
        .await
        .context("Failed to read destination schema")?;

    let missing = missing_columns(source_columns, &schema.field_names());
    info!(
        "{} source columns, {} destination fields, {} missing",
        source_columns.len(),
        schema.fields.len(),
        missing.len()
    );

    if missing.is_empty() {
        println!("{}", "Destination schema is up to date.".green());
        return Ok(());
    }

    println!(
        "{}",
        format!("{} column(s) missing from destination:", missing.len()).bold()
    );
    for column in &missing {
        println!("  + {} {}", column.cyan(), PLACEHOLDER_COLUMN_TYPE.dimmed());
    }

    if dry_run {
        println!("{}", "Dry run: destination not modified.".yellow());
        return Ok(());
    }

    let schema = schema.with_placeholder_fields(&missing);
    warehouse
        .patch_schema(destination, &schema)
        .await
        .context("Failed to update destination schema")?;

    println!("{}", "✓ Destination schema updated.".green().bold());
    Ok(())
}
