//! Pipeline domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a pipeline on the platform
///
/// Opaque: numeric ids and string ids are both carried as text and rendered verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PipelineId(String);

impl PipelineId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PipelineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PipelineId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PipelineId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for PipelineId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// Raw display position reported by the platform for one pipeline
///
/// Free-form text such as `"2024-06-01 09:00:00 IST, Seq No 12"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionReport {
    pub pipeline: PipelineId,
    pub display_position: String,
}

impl PositionReport {
    pub fn new(pipeline: PipelineId, display_position: impl Into<String>) -> Self {
        Self {
            pipeline,
            display_position: display_position.into(),
        }
    }
}
