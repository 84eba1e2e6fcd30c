//! Pipeline-related API endpoints

use lagwatch_core::domain::pipeline::{PipelineId, PositionReport};
use lagwatch_core::dto::position::PositionResponse;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::{PlatformClient, RawResponse};

impl PlatformClient {
    // =============================================================================
    // Pipeline Position
    // =============================================================================

    /// Fetch the display position of a pipeline
    ///
    /// # Arguments
    /// * `pipeline` - The pipeline identifier
    ///
    /// # Errors
    /// - `ProtocolError` if the body lacks `data` or `data.display_position`,
    ///   or a successful response is not JSON
    /// - `ApiError` if a non-success response has no JSON body
    /// - `RequestFailed` if the request itself fails
    pub async fn get_position(&self, pipeline: &PipelineId) -> Result<PositionReport> {
        let url = self.endpoint(&["pipelines", pipeline.as_str(), "position"])?;
        let response = self.get(url)?.send().await?;

        let status = response.status();
        let text = response.text().await?;
        debug!(pipeline = %pipeline, status = status.as_u16(), "position response: {}", text);

        let body: JsonValue = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(ClientError::api_error(status.as_u16(), text));
            }
            Err(e) => {
                return Err(ClientError::ProtocolError(format!(
                    "response is not valid JSON: {}",
                    e
                )));
            }
        };

        let parsed: PositionResponse = serde_json::from_value(body).map_err(|e| {
            ClientError::ProtocolError(format!("unexpected response shape: {}", e))
        })?;

        let data = parsed.data.ok_or_else(|| {
            ClientError::ProtocolError(format!(
                "API response does not contain 'data' key (status {})",
                status.as_u16()
            ))
        })?;

        let display_position = data.display_position.ok_or_else(|| {
            ClientError::ProtocolError(
                "API response does not contain 'data.display_position'".to_string(),
            )
        })?;

        Ok(PositionReport::new(pipeline.clone(), display_position))
    }

    // =============================================================================
    // Object Management
    // =============================================================================

    /// Restart one object (source table) of a pipeline
    ///
    /// The response is returned verbatim; a non-success status is not an error.
    ///
    /// # Arguments
    /// * `pipeline` - The pipeline the object belongs to
    /// * `object_name` - The object name, e.g. "employees.students"
    pub async fn restart_object(
        &self,
        pipeline: &PipelineId,
        object_name: &str,
    ) -> Result<RawResponse> {
        let url = self.endpoint(&["pipelines", pipeline.as_str(), "objects", object_name, "restart"])?;
        let response = self.post(url)?.send().await?;

        self.handle_raw_response(response).await
    }
}
