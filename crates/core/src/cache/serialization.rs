//! Pure functions for serializing/deserializing domain types to/from cache bytes.
//!
//! JSON keeps cache values readable when inspecting the cache by hand.

use crate::news::News;
use thiserror::Error;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes a news snapshot to JSON bytes.
pub fn serialize_news(news: &News) -> Result<Vec<u8>> {
    serde_json::to_vec(news).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a news snapshot.
pub fn deserialize_news(bytes: &[u8]) -> Result<News> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
