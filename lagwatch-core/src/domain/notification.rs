//! Notification target and delivery types

use crate::error::MonitorError;

/// One primary email recipient and the addresses copied on its message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRecipient {
    pub to: String,
    pub cc: Vec<String>,
}

impl EmailRecipient {
    pub fn new(to: impl Into<String>, cc: Vec<String>) -> Self {
        Self { to: to.into(), cc }
    }

    /// Parses a recipient list of the form `to@x=cc1@x,cc2@x;to2@y`
    ///
    /// Entries are separated by `;`, copy lists by `,`. Blank entries are skipped.
    pub fn parse_list(input: &str) -> Result<Vec<Self>, String> {
        let mut recipients = Vec::new();

        for entry in input.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let (to, cc) = match entry.split_once('=') {
                Some((to, cc)) => (to.trim(), cc),
                None => (entry, ""),
            };

            if to.is_empty() {
                return Err(format!("recipient entry '{}' has no primary address", entry));
            }

            let cc = cc
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect();

            recipients.push(Self::new(to, cc));
        }

        Ok(recipients)
    }
}

/// Outcome of delivering a notification to one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Human-readable target, e.g. an address or `slack:683`
    pub target: String,
    pub result: Result<(), MonitorError>,
}

impl Delivery {
    pub fn delivered(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            result: Ok(()),
        }
    }

    pub fn failed(target: impl Into<String>, error: MonitorError) -> Self {
        Self {
            target: target.into(),
            result: Err(error),
        }
    }

    pub fn is_delivered(&self) -> bool {
        self.result.is_ok()
    }
}
