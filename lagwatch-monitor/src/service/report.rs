//! Human-readable rendering of check results
//!
//! The same text is printed to stdout, sent as the email body and, for
//! critical pipelines, posted to the chat webhook.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use lagwatch_core::MonitorError;
use lagwatch_core::domain::assessment::{LagAssessment, PipelineCheck, Severity};
use lagwatch_core::domain::pipeline::PipelineId;
use lagwatch_core::lag::{format_lag, lag_hours, lag_minutes};

pub const SUMMARY_INTRO: &str =
    "Please find below the results of the Lag-Alert Notification System:";

/// Full report of a check cycle: intro line followed by one block per pipeline
pub fn render_summary(checks: &[PipelineCheck], zone: Tz) -> String {
    let blocks: Vec<String> = checks.iter().map(|c| render_check(c, zone)).collect();
    format!("{}\n\n{}", SUMMARY_INTRO, blocks.join("\n"))
}

/// Block for one pipeline, success or failure
pub fn render_check(check: &PipelineCheck, zone: Tz) -> String {
    match &check.outcome {
        Ok(assessment) => render_assessment(assessment, zone),
        Err(e) => format!("{}\n", diagnostic(&check.pipeline, e)),
    }
}

pub fn render_assessment(assessment: &LagAssessment, zone: Tz) -> String {
    format!(
        "Pipeline ID: {}\nTimestamp: {}\nCurrent Time: {}\nLag: {}\n{}\n",
        assessment.pipeline,
        assessment.cleaned,
        format_time(assessment.checked_at, zone),
        format_lag(assessment.lag),
        severity_line(assessment)
    )
}

pub fn severity_line(assessment: &LagAssessment) -> String {
    let pipeline = &assessment.pipeline;
    match assessment.severity {
        Severity::Critical => format!(
            "Critical: Pipeline {} has a lag of {:.2} hours.",
            pipeline,
            lag_hours(assessment.lag)
        ),
        Severity::Warning => format!(
            "Warning: Pipeline {} has a lag of {:.2} minutes.",
            pipeline,
            lag_minutes(assessment.lag)
        ),
        Severity::Ok => format!(
            "Pipeline {} is running smoothly with a lag of {:.2} minutes.",
            pipeline,
            lag_minutes(assessment.lag)
        ),
    }
}

/// One-line message posted for a critical pipeline
pub fn critical_alert(assessment: &LagAssessment) -> String {
    format!(
        "Pipeline {} has a lag of {:.2} hours.",
        assessment.pipeline,
        lag_hours(assessment.lag)
    )
}

pub fn diagnostic(pipeline: &PipelineId, error: &MonitorError) -> String {
    format!("Error processing pipeline {}: {}", pipeline, error)
}

pub fn format_time(instant: DateTime<Utc>, zone: Tz) -> String {
    instant
        .with_timezone(&zone)
        .format("%Y-%m-%d %H:%M:%S %Z")
        .to_string()
}
