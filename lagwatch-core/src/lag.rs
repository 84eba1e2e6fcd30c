//! Lag computation and severity classification
//!
//! Everything here is a pure function of `(now, timestamp, thresholds)`.

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::assessment::{LagAssessment, Severity};
use crate::domain::pipeline::PipelineId;
use crate::timestamp::NormalizedTimestamp;

/// Severity band boundaries
///
/// Bands are evaluated top-down and the first match wins: `lag > critical`
/// is `Critical`, otherwise `lag > warning` is `Warning`, otherwise `Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub warning: TimeDelta,
    pub critical: TimeDelta,
}

impl Thresholds {
    pub fn new(warning: TimeDelta, critical: TimeDelta) -> Self {
        Self { warning, critical }
    }

    /// Builds thresholds from whole minutes and hours
    ///
    /// Fails when either value is outside the range a `TimeDelta` can hold.
    pub fn from_minutes_and_hours(warning_minutes: i64, critical_hours: i64) -> Result<Self, String> {
        let warning = TimeDelta::try_minutes(warning_minutes)
            .ok_or_else(|| format!("warning threshold of {} minutes is out of range", warning_minutes))?;
        let critical = TimeDelta::try_hours(critical_hours)
            .ok_or_else(|| format!("critical threshold of {} hours is out of range", critical_hours))?;
        Ok(Self::new(warning, critical))
    }

    /// Checks `critical > warning > 0`
    pub fn validate(&self) -> Result<(), String> {
        if self.warning <= TimeDelta::zero() {
            return Err("warning threshold must be greater than 0".to_string());
        }
        if self.critical <= self.warning {
            return Err(format!(
                "critical threshold ({}) must be greater than warning threshold ({})",
                format_lag(self.critical),
                format_lag(self.warning)
            ));
        }
        Ok(())
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(TimeDelta::minutes(70), TimeDelta::hours(12))
    }
}

/// Classifies a lag into a severity band
///
/// Negative lags (a report dated in the future) fall through to `Ok`.
pub fn classify(lag: TimeDelta, thresholds: &Thresholds) -> Severity {
    if lag > thresholds.critical {
        Severity::Critical
    } else if lag > thresholds.warning {
        Severity::Warning
    } else {
        Severity::Ok
    }
}

/// Builds the assessment of one pipeline at `now`
pub fn assess(
    pipeline: PipelineId,
    timestamp: NormalizedTimestamp,
    now: DateTime<Utc>,
    thresholds: &Thresholds,
) -> LagAssessment {
    let lag = now - timestamp.instant;

    LagAssessment {
        pipeline,
        cleaned: timestamp.cleaned,
        timestamp: timestamp.instant,
        checked_at: now,
        lag,
        severity: classify(lag, thresholds),
    }
}

/// Lag in fractional hours
pub fn lag_hours(lag: TimeDelta) -> f64 {
    lag.num_milliseconds() as f64 / 3_600_000.0
}

/// Lag in fractional minutes
pub fn lag_minutes(lag: TimeDelta) -> f64 {
    lag.num_milliseconds() as f64 / 60_000.0
}

/// Renders a lag as `[-][Nd ]HH:MM:SS`
pub fn format_lag(lag: TimeDelta) -> String {
    let sign = if lag < TimeDelta::zero() { "-" } else { "" };
    let total = lag.num_seconds().unsigned_abs();

    let days = total / 86_400;
    let hours = (total % 86_400) / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if days > 0 {
        format!("{}{}d {:02}:{:02}:{:02}", sign, days, hours, minutes, seconds)
    } else {
        format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds)
    }
}
