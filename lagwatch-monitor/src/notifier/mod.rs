//! Notification dispatch
//!
//! A notifier delivers the results of one check cycle to its configured
//! targets. Each target is attempted once; a failed delivery is recorded in
//! the returned [`Delivery`] list and never stops the remaining targets.

mod email;
mod slack;

pub use email::EmailNotifier;
pub use slack::SlackNotifier;

use anyhow::Result;
use async_trait::async_trait;
use chrono_tz::Tz;
use lagwatch_core::domain::assessment::PipelineCheck;
use lagwatch_core::domain::notification::Delivery;
use std::time::Duration;

use crate::config::NotifierConfig;

/// Delivers check results to a notification channel
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short channel name used in logs
    fn name(&self) -> &'static str;

    /// Delivers the results of a check cycle
    ///
    /// # Returns
    /// One entry per attempted delivery; empty when nothing warranted a notification
    async fn dispatch(&self, checks: &[PipelineCheck]) -> Vec<Delivery>;
}

/// Builds the notifier selected by configuration, if any
///
/// # Arguments
/// * `config` - Notifier section of the monitor configuration
/// * `zone` - Zone times are rendered in
/// * `timeout` - Timeout for each delivery attempt
pub fn from_config(
    config: &NotifierConfig,
    zone: Tz,
    timeout: Duration,
) -> Result<Option<Box<dyn Notifier>>> {
    let notifier: Box<dyn Notifier> = match config {
        NotifierConfig::None => return Ok(None),
        NotifierConfig::Email(email) => Box::new(EmailNotifier::smtp(email, zone, timeout)?),
        NotifierConfig::Slack(slack) => {
            Box::new(SlackNotifier::with_timeout(slack.webhook_url.clone(), timeout)?)
        }
    };
    Ok(Some(notifier))
}
