//! Lag assessment types

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::pipeline::PipelineId;
use crate::error::MonitorError;

/// Severity band of a pipeline's lag
///
/// Ordered so that `Ok < Warning < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Ok,
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}

/// Outcome of a successful lag check for one pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LagAssessment {
    pub pipeline: PipelineId,
    /// Timestamp text isolated from the display position
    pub cleaned: String,
    /// Instant the display position refers to
    pub timestamp: DateTime<Utc>,
    /// Wall-clock time the check was made at
    pub checked_at: DateTime<Utc>,
    /// `checked_at - timestamp`; negative only when the report is in the future
    pub lag: TimeDelta,
    pub severity: Severity,
}

/// Per-pipeline result of a check cycle
///
/// A batch is a sequence of these in configured order; a failure here never
/// prevents the siblings from being checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineCheck {
    pub pipeline: PipelineId,
    pub outcome: Result<LagAssessment, MonitorError>,
}

impl PipelineCheck {
    pub fn success(assessment: LagAssessment) -> Self {
        Self {
            pipeline: assessment.pipeline.clone(),
            outcome: Ok(assessment),
        }
    }

    pub fn failure(pipeline: PipelineId, error: MonitorError) -> Self {
        Self {
            pipeline,
            outcome: Err(error),
        }
    }

    pub fn assessment(&self) -> Option<&LagAssessment> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&MonitorError> {
        self.outcome.as_ref().err()
    }

    /// Severity of the assessment, `None` when the check failed
    pub fn severity(&self) -> Option<Severity> {
        self.assessment().map(|a| a.severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Ok < Severity::Warning);
        assert!(Severity::Warning < Severity::Critical);
        assert_eq!(Severity::Critical.to_string(), "CRITICAL");
    }

    #[test]
    fn test_failed_check_has_no_severity() {
        let check = PipelineCheck::failure(
            PipelineId::from(75u64),
            MonitorError::transport("connection refused"),
        );
        assert!(check.assessment().is_none());
        assert_eq!(check.severity(), None);
        assert!(check.error().is_some());
    }
}
