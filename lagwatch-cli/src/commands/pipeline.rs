//! Pipeline command handlers
//!
//! Reads display positions and restarts pipeline objects in bulk.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use lagwatch_client::PlatformClient;
use lagwatch_core::domain::pipeline::PipelineId;
use std::io::{self, Write};
use tracing::warn;

use super::write_raw_result;
use crate::config::Config;

/// Pipeline subcommands
#[derive(Subcommand)]
pub enum PipelineCommands {
    /// Print the current display position of pipelines
    Position {
        /// Pipeline IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Restart objects of a pipeline
    Restart {
        /// Pipeline ID
        #[arg(short, long)]
        pipeline: String,

        /// Object names to restart
        #[arg(required = true)]
        objects: Vec<String>,
    },
}

/// Handle pipeline commands
///
/// # Arguments
/// * `command` - The pipeline command to execute
/// * `config` - The CLI configuration
pub async fn handle_pipeline_command(command: PipelineCommands, config: &Config) -> Result<()> {
    let client = config.platform_client()?;
    let mut out = io::stdout();

    match command {
        PipelineCommands::Position { ids } => print_positions(&client, &ids, &mut out).await,
        PipelineCommands::Restart { pipeline, objects } => {
            restart_objects(&client, &PipelineId::new(pipeline), &objects, &mut out).await
        }
    }
}

/// Write each pipeline's display position, continuing past failures
async fn print_positions<W: Write>(client: &PlatformClient, ids: &[String], out: &mut W) -> Result<()> {
    for id in ids.iter().map(PipelineId::new) {
        match client.get_position(&id).await {
            Ok(report) => writeln!(out, "{}: {}", id.to_string().cyan(), report.display_position)?,
            Err(e) => {
                warn!("position read failed for pipeline {}: {}", id, e);
                writeln!(out, "{}: {} {}", id.to_string().cyan(), "Error:".red(), e)?;
            }
        }
    }

    Ok(())
}

/// Restart each object in turn, writing every response verbatim
async fn restart_objects<W: Write>(
    client: &PlatformClient,
    pipeline: &PipelineId,
    objects: &[String],
    out: &mut W,
) -> Result<()> {
    for object in objects {
        let result = client.restart_object(pipeline, object).await;
        write_raw_result(out, &format!("Object: {}", object), &result)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_restart_continues_after_failed_object() {
        colored::control::set_override(false);
        let mut server = mockito::Server::new_async().await;

        let mut mocks = Vec::new();
        for (object, status, body) in [
            ("employees.students", 200, r#"{"success":true}"#),
            ("employees.teachers", 500, "Internal Server Error"),
            ("employees.staff", 200, r#"{"success":true}"#),
        ] {
            mocks.push(
                server
                    .mock("POST", format!("/pipelines/683/objects/{}/restart", object).as_str())
                    .match_header("authorization", "Basic secret")
                    .with_status(status)
                    .with_body(body)
                    .expect(1)
                    .create_async()
                    .await,
            );
        }

        let client = PlatformClient::new(server.url(), "secret");
        let objects = names(&["employees.students", "employees.teachers", "employees.staff"]);
        let mut out = Vec::new();

        restart_objects(&client, &PipelineId::from(683u64), &objects, &mut out)
            .await
            .unwrap();

        for mock in &mocks {
            mock.assert_async().await;
        }

        let text = output(out);
        assert!(text.contains("Object: employees.teachers\nStatus Code: 500\nResponse: Internal Server Error\n"));
        assert!(text.contains("Object: employees.staff\nStatus Code: 200\nResponse: {\"success\":true}\n"));
        assert_eq!(text.matches(&"-".repeat(40)).count(), 3);
    }

    #[tokio::test]
    async fn test_restart_reports_transport_error_and_continues() {
        colored::control::set_override(false);
        let client = PlatformClient::new("http://127.0.0.1:1", "secret");
        let objects = names(&["a.one", "a.two"]);
        let mut out = Vec::new();

        restart_objects(&client, &PipelineId::from(683u64), &objects, &mut out)
            .await
            .unwrap();

        let text = output(out);
        assert!(text.contains("Object: a.one\nError: "));
        assert!(text.contains("Object: a.two\nError: "));
        assert_eq!(text.matches(&"-".repeat(40)).count(), 2);
    }

    #[tokio::test]
    async fn test_positions_continue_after_failure() {
        colored::control::set_override(false);
        let mut server = mockito::Server::new_async().await;
        let ok = server
            .mock("GET", "/pipelines/683/position")
            .with_status(200)
            .with_body(r#"{"data":{"display_position":"2024-06-01 09:00:00 IST, Seq No 12"}}"#)
            .expect(1)
            .create_async()
            .await;
        let failed = server
            .mock("GET", "/pipelines/75/position")
            .with_status(502)
            .with_body("Bad Gateway")
            .expect(1)
            .create_async()
            .await;

        let client = PlatformClient::new(server.url(), "secret");
        let mut out = Vec::new();

        print_positions(&client, &names(&["75", "683"]), &mut out)
            .await
            .unwrap();

        ok.assert_async().await;
        failed.assert_async().await;

        let text = output(out);
        assert!(text.starts_with("75: Error: "));
        assert!(text.contains("683: 2024-06-01 09:00:00 IST, Seq No 12\n"));
    }
}
