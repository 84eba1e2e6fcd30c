//! Record transforms
//!
//! A transform receives one streaming record (an [`Event`]) and returns one
//! of three outcomes: the (possibly mutated) event, a sequence of derived
//! events, or an instruction to drop the record.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// One record flowing through a pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_name: String,
    #[serde(default)]
    pub properties: Map<String, JsonValue>,
}

impl Event {
    pub fn new(event_name: impl Into<String>, properties: Map<String, JsonValue>) -> Self {
        Self {
            event_name: event_name.into(),
            properties,
        }
    }
}

/// Result of applying a transform to one event
#[derive(Debug, Clone, PartialEq)]
pub enum TransformOutcome {
    Single(Event),
    Multiple(Vec<Event>),
    Drop,
}

impl TransformOutcome {
    /// Flattens the outcome into the events that continue down the pipeline
    pub fn into_events(self) -> Vec<Event> {
        match self {
            TransformOutcome::Single(event) => vec![event],
            TransformOutcome::Multiple(events) => events,
            TransformOutcome::Drop => Vec::new(),
        }
    }
}

/// A record transform
pub trait Transform {
    fn apply(&self, event: Event) -> TransformOutcome;
}

impl<F> Transform for F
where
    F: Fn(Event) -> TransformOutcome,
{
    fn apply(&self, event: Event) -> TransformOutcome {
        self(event)
    }
}

/// Replaces one named property with its base64-encoded string form
#[derive(Debug, Clone)]
pub struct MaskProperty {
    property: String,
}

impl MaskProperty {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
        }
    }
}

impl Transform for MaskProperty {
    fn apply(&self, mut event: Event) -> TransformOutcome {
        if let Some(value) = event.properties.get_mut(&self.property) {
            *value = JsonValue::String(mask_value(value));
        }
        TransformOutcome::Single(event)
    }
}

/// Base64 of a value's string form: strings as-is, anything else as JSON text
pub fn mask_value(value: &JsonValue) -> String {
    let text = match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    };
    STANDARD.encode(text.as_bytes())
}
