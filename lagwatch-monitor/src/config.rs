//! Monitor configuration
//!
//! Defines every deployment-specific parameter of a lag check run: platform
//! connection, pipelines to check, timezone handling, severity thresholds and
//! the notification channel. Nothing here has a hard-coded value that a
//! deployment cannot override.

use anyhow::{Context, anyhow, bail};
use chrono_tz::Tz;
use lagwatch_core::domain::notification::EmailRecipient;
use lagwatch_core::domain::pipeline::PipelineId;
use lagwatch_core::lag::Thresholds;
use lagwatch_core::timestamp::ZoneTable;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_POSITION_MARKER: &str = ", Seq No";
pub const DEFAULT_EMAIL_SUBJECT: &str = "Lag-Alert Notification System Results";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_WARNING_MINUTES: i64 = 70;
const DEFAULT_CRITICAL_HOURS: i64 = 12;

/// Monitor configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Platform API root (e.g., "https://us.hevodata.com/api/public/v2.0")
    pub api_url: String,

    /// Token sent as `Authorization: Basic <token>`
    pub api_token: String,

    /// Pipelines to check, in order
    pub pipeline_ids: Vec<PipelineId>,

    /// Token the display position is cut at
    pub position_marker: String,

    /// Zone attached to zone-less timestamps and used to display times
    pub default_zone: Tz,

    /// Abbreviation table for zone-bearing timestamps
    pub zones: ZoneTable,

    pub thresholds: Thresholds,

    /// Timeout applied to every outbound request
    pub request_timeout: Duration,

    pub notifier: NotifierConfig,
}

/// Notification channel selected by the deployment
#[derive(Debug, Clone)]
pub enum NotifierConfig {
    /// Report is printed only
    None,
    Email(EmailConfig),
    Slack(SlackConfig),
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub recipients: Vec<EmailRecipient>,
    pub subject: String,
}

#[derive(Debug, Clone)]
pub struct SlackConfig {
    pub webhook_url: String,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - PLATFORM_API_URL, or PLATFORM_REGION to derive it
    /// - PLATFORM_API_TOKEN (required)
    /// - PIPELINE_IDS (required, comma-separated)
    /// - DEFAULT_TIMEZONE (required, IANA name such as Asia/Kolkata)
    /// - POSITION_MARKER (optional, default: ", Seq No")
    /// - TZ_ABBREVIATIONS (optional, ABBR=+HH:MM pairs replacing the built-in table)
    /// - WARNING_THRESHOLD_MINUTES (optional, default: 70)
    /// - CRITICAL_THRESHOLD_HOURS (optional, default: 12)
    /// - REQUEST_TIMEOUT_SECS (optional, default: 30)
    /// - NOTIFIER (optional, email | slack | none, default: none)
    /// - SMTP_HOST, SMTP_PORT, SMTP_USERNAME, SMTP_PASSWORD, EMAIL_FROM,
    ///   EMAIL_RECIPIENTS, EMAIL_SUBJECT (email notifier)
    /// - SLACK_WEBHOOK_URL (slack notifier)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &str| get(key).ok_or_else(|| anyhow!("{} environment variable not set", key));

        let api_url = match get("PLATFORM_API_URL") {
            Some(url) => url,
            None => {
                let region = get("PLATFORM_REGION").ok_or_else(|| {
                    anyhow!("PLATFORM_API_URL or PLATFORM_REGION environment variable must be set")
                })?;
                format!("https://{}.hevodata.com/api/public/v2.0", region)
            }
        };

        let api_token = require("PLATFORM_API_TOKEN")?;

        let pipeline_ids = require("PIPELINE_IDS")?
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(PipelineId::from)
            .collect();

        let zone_name = require("DEFAULT_TIMEZONE")?;
        let default_zone = Tz::from_str(&zone_name)
            .map_err(|e| anyhow!("invalid DEFAULT_TIMEZONE '{}': {}", zone_name, e))?;

        let position_marker = lookup("POSITION_MARKER")
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_POSITION_MARKER.to_string());

        let zones = match get("TZ_ABBREVIATIONS") {
            Some(pairs) => ZoneTable::parse(&pairs)
                .map_err(|e| anyhow!("invalid TZ_ABBREVIATIONS: {}", e))?,
            None => ZoneTable::default(),
        };

        let warning: i64 = parse_or(&get, "WARNING_THRESHOLD_MINUTES", DEFAULT_WARNING_MINUTES)?;
        let critical: i64 = parse_or(&get, "CRITICAL_THRESHOLD_HOURS", DEFAULT_CRITICAL_HOURS)?;
        let thresholds = Thresholds::from_minutes_and_hours(warning, critical)
            .map_err(|e| anyhow!("invalid thresholds: {}", e))?;

        let request_timeout = Duration::from_secs(parse_or(
            &get,
            "REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);

        let notifier = match get("NOTIFIER").as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("none") => NotifierConfig::None,
            Some("email") => {
                let username = require("SMTP_USERNAME")?;
                let recipients = EmailRecipient::parse_list(&require("EMAIL_RECIPIENTS")?)
                    .map_err(|e| anyhow!("invalid EMAIL_RECIPIENTS: {}", e))?;

                NotifierConfig::Email(EmailConfig {
                    smtp_host: require("SMTP_HOST")?,
                    smtp_port: parse_or(&get, "SMTP_PORT", DEFAULT_SMTP_PORT)?,
                    password: require("SMTP_PASSWORD")?,
                    from: get("EMAIL_FROM").unwrap_or_else(|| username.clone()),
                    username,
                    recipients,
                    subject: get("EMAIL_SUBJECT")
                        .unwrap_or_else(|| DEFAULT_EMAIL_SUBJECT.to_string()),
                })
            }
            Some("slack") => NotifierConfig::Slack(SlackConfig {
                webhook_url: require("SLACK_WEBHOOK_URL")?,
            }),
            Some(other) => bail!("unknown NOTIFIER '{}': expected email, slack or none", other),
        };

        Ok(Self {
            api_url,
            api_token,
            pipeline_ids,
            position_marker,
            default_zone,
            zones,
            thresholds,
            request_timeout,
            notifier,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            bail!("api_url must start with http:// or https://");
        }

        if self.pipeline_ids.is_empty() {
            bail!("at least one pipeline id must be configured");
        }

        if self.position_marker.trim().is_empty() {
            bail!("position_marker cannot be empty");
        }

        if self.zones.is_empty() {
            bail!("timezone abbreviation table cannot be empty");
        }

        self.thresholds
            .validate()
            .map_err(|e| anyhow!("invalid thresholds: {}", e))?;

        if self.request_timeout.is_zero() {
            bail!("request_timeout must be greater than 0");
        }

        match &self.notifier {
            NotifierConfig::None => {}
            NotifierConfig::Email(email) => {
                if email.recipients.is_empty() {
                    bail!("email notifier needs at least one recipient");
                }
            }
            NotifierConfig::Slack(slack) => {
                if !slack.webhook_url.starts_with("https://")
                    && !slack.webhook_url.starts_with("http://")
                {
                    bail!("slack webhook url must start with http:// or https://");
                }
            }
        }

        Ok(())
    }
}

/// Parses an optional value, falling back to `default` when unset
fn parse_or<T, G>(get: &G, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} has invalid value '{}'", key, raw)),
        None => Ok(default),
    }
}
