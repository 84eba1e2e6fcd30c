//! Chat webhook DTOs

use serde::{Deserialize, Serialize};

/// Payload accepted by Slack-style incoming webhooks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookMessage {
    pub text: String,
}
