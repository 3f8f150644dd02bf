//! Event envelope and metadata types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key under which the payload is stored in the event envelope.
pub const EVENT_KEY: &str = "event";

/// Metadata fields sent alongside the payload (host, source, sourcetype, time).
pub type Metadata = serde_json::Map<String, Value>;

/// An event as submitted to the collector: `{ <metadata...>, "event": <payload> }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Indexing metadata placed next to the payload.
    #[serde(flatten)]
    pub metadata: Metadata,

    /// The raw payload.
    pub event: Value,
}

impl Event {
    /// Creates an event without metadata.
    pub fn new(event: impl Into<Value>) -> Self {
        Self {
            metadata: Metadata::new(),
            event: event.into(),
        }
    }

    /// Creates an event from any serializable payload.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the payload cannot be represented as JSON.
    pub fn from_payload<T: Serialize + ?Sized>(payload: &T) -> crate::Result<Self> {
        Ok(Self::new(serde_json::to_value(payload)?))
    }

    /// Merges metadata into the event; incoming keys win on conflict.
    ///
    /// An `event` key in the metadata never replaces the payload.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata.extend(metadata);
        self.metadata.remove(EVENT_KEY);
        self
    }

    /// Sets a single metadata field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        if name != EVENT_KEY {
            self.metadata.insert(name, value.into());
        }
        self
    }

    /// Returns metadata keys that are not in the given set of indexed fields.
    pub fn unrecognized_fields<'a>(&'a self, valid: &BTreeSet<String>) -> Vec<&'a str> {
        self.metadata
            .keys()
            .filter(|key| !valid.contains(key.as_str()))
            .map(String::as_str)
            .collect()
    }
}
