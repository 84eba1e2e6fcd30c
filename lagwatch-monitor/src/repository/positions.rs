//! Positions repository
//!
//! Reads pipeline display positions from the platform. One request per
//! call, no retry, no caching.

use async_trait::async_trait;
use lagwatch_client::PlatformClient;
use lagwatch_core::MonitorError;
use lagwatch_core::domain::pipeline::{PipelineId, PositionReport};

/// Repository trait for pipeline position reads
#[async_trait]
pub trait PositionRepository: Send + Sync {
    /// Fetches the current display position of a pipeline
    ///
    /// # Arguments
    /// * `pipeline` - The pipeline to read
    ///
    /// # Errors
    /// `Transport` when the call fails, `Protocol` when the response is malformed
    async fn fetch_position(&self, pipeline: &PipelineId) -> Result<PositionReport, MonitorError>;
}

/// HTTP implementation of PositionRepository
pub struct HttpPositionRepository {
    client: PlatformClient,
}

impl HttpPositionRepository {
    /// Creates a new HTTP position repository
    ///
    /// # Arguments
    /// * `client` - Platform client, already configured with token and timeout
    pub fn new(client: PlatformClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PositionRepository for HttpPositionRepository {
    async fn fetch_position(&self, pipeline: &PipelineId) -> Result<PositionReport, MonitorError> {
        self.client
            .get_position(pipeline)
            .await
            .map_err(MonitorError::from)
    }
}

/// Fixed positions keyed by pipeline id, for tests
#[cfg(test)]
pub struct StaticPositionRepository {
    positions: std::collections::HashMap<String, Result<String, MonitorError>>,
}

#[cfg(test)]
impl StaticPositionRepository {
    pub fn new() -> Self {
        Self {
            positions: std::collections::HashMap::new(),
        }
    }

    pub fn with_position(mut self, pipeline: &str, display_position: &str) -> Self {
        self.positions
            .insert(pipeline.to_string(), Ok(display_position.to_string()));
        self
    }

    pub fn with_error(mut self, pipeline: &str, error: MonitorError) -> Self {
        self.positions.insert(pipeline.to_string(), Err(error));
        self
    }
}

#[cfg(test)]
#[async_trait]
impl PositionRepository for StaticPositionRepository {
    async fn fetch_position(&self, pipeline: &PipelineId) -> Result<PositionReport, MonitorError> {
        match self.positions.get(pipeline.as_str()) {
            Some(Ok(raw)) => Ok(PositionReport::new(pipeline.clone(), raw.clone())),
            Some(Err(e)) => Err(e.clone()),
            None => Err(MonitorError::transport(format!(
                "no position stubbed for pipeline {}",
                pipeline
            ))),
        }
    }
}
