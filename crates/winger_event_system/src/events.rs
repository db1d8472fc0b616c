//! # Event Encoding
//!
//! Every payload that crosses a role boundary (directive arguments, field
//! values, whole replication messages) implements [`Event`]. The blanket
//! implementation gives any `Serialize + DeserializeOwned` type JSON encoding,
//! so adding a new payload is just a matter of deriving the serde traits.

use serde::{de::DeserializeOwned, Serialize};
use std::any::Any;

/// Core trait for anything that can be sent from the authority to observers.
///
/// Events must be `Send + Sync` as the host may hand them across threads, and
/// `Debug` so failures can be logged with the offending value.
pub trait Event: Send + Sync + Any + std::fmt::Debug {
    /// Stable type name used in logs.
    fn type_name() -> &'static str
    where
        Self: Sized;

    /// Serializes the event to bytes for transmission.
    fn serialize(&self) -> Result<Vec<u8>, EventError>;

    /// Deserializes an event from bytes.
    fn deserialize(data: &[u8]) -> Result<Self, EventError>
    where
        Self: Sized;

    /// Returns a reference to this event as `&dyn Any` for dynamic typing.
    fn as_any(&self) -> &dyn Any;
}

/// Blanket implementation with JSON serialization.
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use winger_event_system::Event;
///
/// #[derive(Debug, Serialize, Deserialize, PartialEq)]
/// struct Ping { seq: u32 }
///
/// let bytes = Event::serialize(&Ping { seq: 7 }).unwrap();
/// assert_eq!(<Ping as Event>::deserialize(&bytes).unwrap(), Ping { seq: 7 });
/// ```
impl<T> Event for T
where
    T: Serialize + DeserializeOwned + Send + Sync + Any + std::fmt::Debug + 'static,
{
    fn type_name() -> &'static str {
        std::any::type_name::<T>()
    }

    fn serialize(&self) -> Result<Vec<u8>, EventError> {
        serde_json::to_vec(self).map_err(|e| {
            tracing::error!(
                "🔴 Event serialization failed for type '{}': {} (event debug: {:?})",
                Self::type_name(),
                e,
                self
            );
            EventError::Serialization(e)
        })
    }

    fn deserialize(data: &[u8]) -> Result<Self, EventError> {
        serde_json::from_slice(data).map_err(|e| {
            let data_preview = if data.len() > 200 {
                format!(
                    "{}... (truncated {} bytes)",
                    String::from_utf8_lossy(&data[..200]),
                    data.len() - 200
                )
            } else {
                String::from_utf8_lossy(data).to_string()
            };

            tracing::error!(
                "🔴 Event deserialization failed for type '{}': {} (data length: {} bytes, content preview: '{}')",
                Self::type_name(),
                e,
                data.len(),
                data_preview
            );
            EventError::Deserialization(e)
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Converts a payload into a JSON value for embedding in an envelope.
pub fn to_payload<E: Serialize>(payload: &E) -> Result<serde_json::Value, EventError> {
    serde_json::to_value(payload).map_err(EventError::Serialization)
}

/// Extracts a typed payload from a JSON value carried by an envelope.
pub fn from_payload<E: DeserializeOwned>(value: &serde_json::Value) -> Result<E, EventError> {
    serde_json::from_value(value.clone()).map_err(EventError::Deserialization)
}

/// Errors raised while encoding or decoding events.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// Serialization failed when converting an event to bytes
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),
    /// Deserialization failed when converting bytes to an event
    #[error("Deserialization error: {0}")]
    Deserialization(#[source] serde_json::Error),
    /// No handler understands the named event
    #[error("Handler not found: {0}")]
    HandlerNotFound(String),
    /// A handler failed while processing an event
    #[error("Handler execution error: {0}")]
    HandlerExecution(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vec3;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestMoveEvent {
        target: Vec3,
        length: f64,
    }

    #[test]
    fn test_blanket_event_serialization() {
        let event = TestMoveEvent {
            target: Vec3::new(1.0, 5.0, 0.0),
            length: 20.0,
        };

        let bytes = Event::serialize(&event).unwrap();
        let decoded = <TestMoveEvent as Event>::deserialize(&bytes).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn test_deserialization_error_is_reported() {
        let result = <TestMoveEvent as Event>::deserialize(b"{\"target\": 12}");
        assert!(matches!(result, Err(EventError::Deserialization(_))));
    }

    #[test]
    fn test_payload_helpers() {
        let value = to_payload(&(5.0_f64, 20.0_f64)).unwrap();
        let (half, length): (f64, f64) = from_payload(&value).unwrap();
        assert_eq!(half, 5.0);
        assert_eq!(length, 20.0);

        let bad: Result<Vec3, _> = from_payload(&serde_json::json!("nope"));
        assert!(bad.is_err());
    }
}
