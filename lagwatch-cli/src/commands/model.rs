//! Model command handlers

use anyhow::Result;
use clap::Subcommand;
use lagwatch_client::PlatformClient;
use std::io::{self, Write};

use super::write_raw_result;
use crate::config::Config;

/// Model subcommands
#[derive(Subcommand)]
pub enum ModelCommands {
    /// Trigger an immediate run of models
    Run {
        /// Model IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

/// Handle model commands
pub async fn handle_model_command(command: ModelCommands, config: &Config) -> Result<()> {
    let client = config.platform_client()?;

    match command {
        ModelCommands::Run { ids } => run_models(&client, &ids, &mut io::stdout()).await,
    }
}

/// Trigger each model in turn, writing every response verbatim
async fn run_models<W: Write>(client: &PlatformClient, ids: &[String], out: &mut W) -> Result<()> {
    for id in ids {
        let result = client.run_model(id).await;
        write_raw_result(out, &format!("Model ID: {}", id), &result)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_continues_after_failed_model() {
        colored::control::set_override(false);
        let mut server = mockito::Server::new_async().await;

        let mut mocks = Vec::new();
        for (id, status, body) in [
            ("11", 200, r#"{"success":true}"#),
            ("12", 404, r#"{"error":"model not found"}"#),
            ("13", 200, r#"{"success":true}"#),
        ] {
            mocks.push(
                server
                    .mock("POST", format!("/models/{}/run-now", id).as_str())
                    .with_status(status)
                    .with_body(body)
                    .expect(1)
                    .create_async()
                    .await,
            );
        }

        let client = PlatformClient::new(server.url(), "secret");
        let ids: Vec<String> = ["11", "12", "13"].iter().map(|s| s.to_string()).collect();
        let mut out = Vec::new();

        run_models(&client, &ids, &mut out).await.unwrap();

        for mock in &mocks {
            mock.assert_async().await;
        }

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(
            "Model ID: 12\nStatus Code: 404\nResponse: {\"error\":\"model not found\"}\n"
        ));
        assert!(text.ends_with(&format!("Model ID: 13\nStatus Code: 200\nResponse: {{\"success\":true}}\n{}\n", "-".repeat(40))));
    }
}
