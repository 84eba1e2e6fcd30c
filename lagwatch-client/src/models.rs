//! Model-related API endpoints

use crate::error::Result;
use crate::{PlatformClient, RawResponse};

impl PlatformClient {
    /// Trigger an immediate run of a model
    ///
    /// The response is returned verbatim; a non-success status is not an error.
    ///
    /// # Arguments
    /// * `model_id` - The model identifier
    pub async fn run_model(&self, model_id: &str) -> Result<RawResponse> {
        let url = self.endpoint(&["models", model_id, "run-now"])?;
        let response = self.post(url)?.send().await?;

        self.handle_raw_response(response).await
    }
}
