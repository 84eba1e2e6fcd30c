//! Chat webhook notifier
//!
//! Posts one message per critical pipeline to a Slack-style incoming webhook.

use async_trait::async_trait;
use lagwatch_core::MonitorError;
use lagwatch_core::domain::assessment::{PipelineCheck, Severity};
use lagwatch_core::domain::notification::Delivery;
use lagwatch_core::dto::webhook::WebhookMessage;
use reqwest::Client;
use std::time::Duration;
use tracing::{error, info};

use super::Notifier;
use crate::service::report::critical_alert;

pub struct SlackNotifier {
    client: Client,
    webhook_url: String,
}

impl SlackNotifier {
    pub fn with_timeout(webhook_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            webhook_url: webhook_url.into(),
        })
    }

    /// Posts a single message to the webhook
    pub async fn post(&self, text: String) -> Result<(), MonitorError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&WebhookMessage { text })
            .send()
            .await
            .map_err(|e| MonitorError::delivery(format!("webhook request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MonitorError::delivery(format!(
                "Failed to send message to Slack (status {}): {}",
                status.as_u16(),
                body
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    fn name(&self) -> &'static str {
        "slack"
    }

    async fn dispatch(&self, checks: &[PipelineCheck]) -> Vec<Delivery> {
        let mut deliveries = Vec::new();

        let critical = checks
            .iter()
            .filter_map(PipelineCheck::assessment)
            .filter(|a| a.severity == Severity::Critical);

        for assessment in critical {
            let target = format!("slack:{}", assessment.pipeline);

            match self.post(critical_alert(assessment)).await {
                Ok(()) => {
                    info!(pipeline = %assessment.pipeline, "posted critical lag alert");
                    deliveries.push(Delivery::delivered(target));
                }
                Err(e) => {
                    error!(pipeline = %assessment.pipeline, "{}", e);
                    deliveries.push(Delivery::failed(target, e));
                }
            }
        }

        deliveries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::StaticPositionRepository;
    use crate::service::{LagCheckService, StandardLagCheckService};
    use chrono::{DateTime, Utc};
    use lagwatch_core::ErrorKind;
    use lagwatch_core::domain::pipeline::PipelineId;
    use lagwatch_core::lag::Thresholds;
    use lagwatch_core::timestamp::{TimestampNormalizer, ZoneTable};
    use mockito::Matcher;
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        // 2024-06-01 21:30:00 IST
        DateTime::parse_from_rfc3339("2024-06-01T16:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn service(repo: StaticPositionRepository) -> StandardLagCheckService {
        StandardLagCheckService::new(
            Arc::new(repo),
            TimestampNormalizer::new(", Seq No", ZoneTable::default(), chrono_tz::Asia::Kolkata),
            Thresholds::from_minutes_and_hours(70, 12).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_critical_pipeline_triggers_one_notification() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({
                "text": "Pipeline 683 has a lag of 12.50 hours."
            })))
            .with_status(200)
            .with_body("ok")
            .expect(1)
            .create_async()
            .await;

        let svc = service(
            StaticPositionRepository::new().with_position("683", "2024-06-01 09:00:00 IST, Seq No 12"),
        );
        let checks = svc.check_all(&[PipelineId::from(683u64)], now()).await;

        let notifier = SlackNotifier::with_timeout(format!("{}/hook", server.url()), Duration::from_secs(5)).unwrap();
        let deliveries = notifier.dispatch(&checks).await;

        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].target, "slack:683");
        assert!(deliveries[0].is_delivered());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_healthy_batch_with_failure_sends_nothing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .expect(0)
            .create_async()
            .await;

        let svc = service(
            StaticPositionRepository::new()
                .with_error("75", MonitorError::transport("connection refused"))
                .with_position("63", "2024-06-01 21:25:00 IST, Seq No 3"),
        );
        let checks = svc
            .check_all(&[PipelineId::from(75u64), PipelineId::from(63u64)], now())
            .await;

        let notifier = SlackNotifier::with_timeout(format!("{}/hook", server.url()), Duration::from_secs(5)).unwrap();
        let deliveries = notifier.dispatch(&checks).await;

        assert!(deliveries.is_empty());
        assert!(checks[0].error().is_some());
        assert_eq!(checks[1].severity(), Some(Severity::Ok));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_webhook_error_status_is_delivery_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/hook")
            .with_status(404)
            .with_body("no_service")
            .expect(2)
            .create_async()
            .await;

        let svc = service(
            StaticPositionRepository::new()
                .with_position("1", "2024-05-31 09:00:00 IST, Seq No 1")
                .with_position("2", "2024-05-30 09:00:00 IST, Seq No 1"),
        );
        let checks = svc
            .check_all(&[PipelineId::from(1u64), PipelineId::from(2u64)], now())
            .await;

        let notifier = SlackNotifier::with_timeout(format!("{}/hook", server.url()), Duration::from_secs(5)).unwrap();
        let deliveries = notifier.dispatch(&checks).await;

        assert_eq!(deliveries.len(), 2);
        for delivery in &deliveries {
            let err = delivery.result.as_ref().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Delivery);
            assert!(err.detail().contains("no_service"));
        }
    }
}
