//! Email notifier
//!
//! Sends the full check report, one message per primary recipient with its
//! copy list, over an authenticated SMTP submission session (STARTTLS).

use async_trait::async_trait;
use chrono_tz::Tz;
use lagwatch_core::MonitorError;
use lagwatch_core::domain::assessment::PipelineCheck;
use lagwatch_core::domain::notification::{Delivery, EmailRecipient};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::fmt::Display;
use std::time::Duration;
use tracing::{error, info};

use super::Notifier;
use crate::config::EmailConfig;
use crate::service::report::render_summary;

pub struct EmailNotifier<T> {
    transport: T,
    from: Mailbox,
    recipients: Vec<EmailRecipient>,
    subject: String,
    zone: Tz,
}

impl EmailNotifier<AsyncSmtpTransport<Tokio1Executor>> {
    /// Creates a notifier sending through the configured SMTP relay
    pub fn smtp(config: &EmailConfig, zone: Tz, timeout: Duration) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(timeout))
            .build();

        Self::new(
            transport,
            &config.from,
            config.recipients.clone(),
            config.subject.clone(),
            zone,
        )
    }
}

impl<T> EmailNotifier<T>
where
    T: AsyncTransport + Send + Sync,
    T::Error: Display,
{
    /// Creates a notifier over any lettre transport
    pub fn new(
        transport: T,
        from: &str,
        recipients: Vec<EmailRecipient>,
        subject: String,
        zone: Tz,
    ) -> anyhow::Result<Self> {
        let from = from
            .parse::<Mailbox>()
            .map_err(|e| anyhow::anyhow!("invalid sender address '{}': {}", from, e))?;

        Ok(Self {
            transport,
            from,
            recipients,
            subject,
            zone,
        })
    }

    /// Composes the message for one primary recipient
    pub fn build_message(&self, recipient: &EmailRecipient, body: &str) -> Result<Message, MonitorError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(&recipient.to)?)
            .subject(self.subject.clone())
            .header(ContentType::TEXT_PLAIN);

        for cc in &recipient.cc {
            builder = builder.cc(parse_mailbox(cc)?);
        }

        builder
            .body(body.to_string())
            .map_err(|e| MonitorError::delivery(format!("failed to build message: {}", e)))
    }

    async fn send_to(&self, recipient: &EmailRecipient, body: &str) -> Result<(), MonitorError> {
        let message = self.build_message(recipient, body)?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| MonitorError::delivery(format!("Failed to send email to {}: {}", recipient.to, e)))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MonitorError> {
    address
        .parse()
        .map_err(|e| MonitorError::delivery(format!("invalid address '{}': {}", address, e)))
}

#[async_trait]
impl<T> Notifier for EmailNotifier<T>
where
    T: AsyncTransport + Send + Sync,
    T::Error: Display,
{
    fn name(&self) -> &'static str {
        "email"
    }

    async fn dispatch(&self, checks: &[PipelineCheck]) -> Vec<Delivery> {
        let body = render_summary(checks, self.zone);
        let mut deliveries = Vec::with_capacity(self.recipients.len());

        for recipient in &self.recipients {
            match self.send_to(recipient, &body).await {
                Ok(()) => {
                    info!(
                        "Notification sent to {} with CC to {}",
                        recipient.to,
                        recipient.cc.join(", ")
                    );
                    deliveries.push(Delivery::delivered(&recipient.to));
                }
                Err(e) => {
                    error!("{}", e);
                    deliveries.push(Delivery::failed(&recipient.to, e));
                }
            }
        }

        deliveries
    }
}
