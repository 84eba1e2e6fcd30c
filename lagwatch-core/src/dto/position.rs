//! Pipeline position DTOs

use serde::{Deserialize, Serialize};

/// Body of `GET /pipelines/{id}/position`
///
/// Only the `data` envelope is interpreted; any other top-level keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionResponse {
    #[serde(default)]
    pub data: Option<PositionData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionData {
    #[serde(default)]
    pub display_position: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_data_envelope_deserializes_to_none() {
        let resp: PositionResponse = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert!(resp.data.is_none());
    }

    #[test]
    fn test_display_position_is_extracted() {
        let resp: PositionResponse = serde_json::from_str(
            r#"{"data":{"display_position":"2024-06-01 09:00:00 IST, Seq No 12","offset":7}}"#,
        )
        .unwrap();
        assert_eq!(
            resp.data.unwrap().display_position.as_deref(),
            Some("2024-06-01 09:00:00 IST, Seq No 12")
        );
    }
}
