//! Lagwatch Monitor
//!
//! Checks the replication lag of a batch of pipelines and notifies on it.
//!
//! Architecture:
//! - Configuration: Load deployment settings from the environment
//! - Repositories: HTTP reads of pipeline display positions
//! - Services: Lag checks and report rendering
//! - Notifiers: Email summary or chat alerts for critical pipelines
//!
//! One invocation runs one check cycle. Scheduling is left to the host
//! (cron, a container job, etc.). The report is written to stdout, logs to
//! stderr.

mod config;
mod notifier;
mod repository;
mod service;

use anyhow::{Context, Result};
use chrono::Utc;
use lagwatch_core::domain::assessment::Severity;
use lagwatch_core::timestamp::TimestampNormalizer;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::repository::{HttpPositionRepository, PositionRepository};
use crate::service::report::{render_summary, severity_line};
use crate::service::{LagCheckService, StandardLagCheckService};
use lagwatch_client::PlatformClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lagwatch_monitor=info,lagwatch_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting Lagwatch Monitor");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    info!(
        "Loaded configuration: api_url={}, pipelines={}, default_zone={}, zone_abbreviations={}",
        config.api_url,
        config.pipeline_ids.len(),
        config.default_zone,
        config.zones.len()
    );

    // Initialize platform client
    let client = PlatformClient::with_timeout(
        config.api_url.clone(),
        config.api_token.clone(),
        config.request_timeout,
    )
    .context("Failed to build platform client")?;

    // Initialize services
    let positions: Arc<dyn PositionRepository> = Arc::new(HttpPositionRepository::new(client));
    let normalizer = TimestampNormalizer::new(
        config.position_marker.clone(),
        config.zones.clone(),
        config.default_zone,
    );
    let checker = StandardLagCheckService::new(positions, normalizer, config.thresholds);

    let notifier = notifier::from_config(&config.notifier, config.default_zone, config.request_timeout)
        .context("Failed to initialize notifier")?;

    info!("Services initialized");

    // Run the check cycle
    let checks = checker.check_all(&config.pipeline_ids, Utc::now()).await;

    for check in &checks {
        match &check.outcome {
            Ok(assessment) => match assessment.severity {
                Severity::Critical => error!("{}", severity_line(assessment)),
                Severity::Warning => warn!("{}", severity_line(assessment)),
                Severity::Ok => info!("{}", severity_line(assessment)),
            },
            Err(e) => error!("Error processing pipeline {}: {}", check.pipeline, e),
        }
    }

    println!("{}", render_summary(&checks, config.default_zone));

    // Notify
    let Some(notifier) = notifier else {
        info!("No notifier configured, report printed only");
        return Ok(());
    };

    let deliveries = notifier.dispatch(&checks).await;
    let failed = deliveries.iter().filter(|d| !d.is_delivered()).count();

    info!(
        "{} notifier: {} delivered, {} failed",
        notifier.name(),
        deliveries.len() - failed,
        failed
    );

    Ok(())
}
