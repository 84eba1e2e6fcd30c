//! Lag check service
//!
//! Runs `Fetch → Normalize → Classify` for each pipeline, one at a time and
//! in configured order. The first failure of a pipeline is captured in its
//! [`PipelineCheck`]; it never aborts the remaining pipelines.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use lagwatch_core::domain::assessment::{PipelineCheck, Severity};
use lagwatch_core::domain::pipeline::PipelineId;
use lagwatch_core::lag::{self, Thresholds};
use lagwatch_core::timestamp::TimestampNormalizer;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::repository::PositionRepository;

/// Service trait for lag checks
#[async_trait]
pub trait LagCheckService: Send + Sync {
    /// Checks a single pipeline as of `now`
    async fn check(&self, pipeline: &PipelineId, now: DateTime<Utc>) -> PipelineCheck;

    /// Checks every pipeline sequentially as of `now`
    ///
    /// # Returns
    /// One result per pipeline, in the order given
    async fn check_all(&self, pipelines: &[PipelineId], now: DateTime<Utc>) -> Vec<PipelineCheck> {
        let mut checks = Vec::with_capacity(pipelines.len());
        for pipeline in pipelines {
            checks.push(self.check(pipeline, now).await);
        }
        checks
    }
}

/// Standard implementation of LagCheckService
pub struct StandardLagCheckService {
    positions: Arc<dyn PositionRepository>,
    normalizer: TimestampNormalizer,
    thresholds: Thresholds,
}

impl StandardLagCheckService {
    /// Creates a new lag check service
    ///
    /// # Arguments
    /// * `positions` - Source of display positions
    /// * `normalizer` - Timestamp normalizer with the deployment's marker and zones
    /// * `thresholds` - Severity band boundaries
    pub fn new(
        positions: Arc<dyn PositionRepository>,
        normalizer: TimestampNormalizer,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            positions,
            normalizer,
            thresholds,
        }
    }
}

#[async_trait]
impl LagCheckService for StandardLagCheckService {
    async fn check(&self, pipeline: &PipelineId, now: DateTime<Utc>) -> PipelineCheck {
        let report = match self.positions.fetch_position(pipeline).await {
            Ok(report) => report,
            Err(e) => return PipelineCheck::failure(pipeline.clone(), e),
        };
        debug!(pipeline = %pipeline, "display position: {}", report.display_position);

        let timestamp = match self.normalizer.normalize(&report) {
            Ok(ts) => ts,
            Err(e) => return PipelineCheck::failure(pipeline.clone(), e),
        };
        debug!(pipeline = %pipeline, "cleaned timestamp: {}", timestamp.cleaned);

        let assessment = lag::assess(pipeline.clone(), timestamp, now, &self.thresholds);

        if assessment.lag < TimeDelta::zero() {
            warn!(
                pipeline = %pipeline,
                "position '{}' is {} ahead of now; check DEFAULT_TIMEZONE and TZ_ABBREVIATIONS",
                assessment.cleaned,
                lag::format_lag(-assessment.lag)
            );
        }

        match assessment.severity {
            Severity::Ok => info!(pipeline = %pipeline, "lag {}", lag::format_lag(assessment.lag)),
            Severity::Warning | Severity::Critical => warn!(
                pipeline = %pipeline,
                severity = %assessment.severity,
                "lag {}",
                lag::format_lag(assessment.lag)
            ),
        }

        PipelineCheck::success(assessment)
    }
}
