//! Codecs turning domain values into cache bytes and back.
//!
//! JSON is the default wire format: cache values stay human-readable and easy
//! to inspect with `redis-cli`.

use serde::de::DeserializeOwned;
use serde::Serialize;
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

/// Converts values of `T` to and from cache bytes.
///
/// For every value `v`, `decode(&encode(&v)?)? == v`, and likewise for lists.
pub trait Codec<T>: Send + Sync {
    fn encode(&self, value: &T) -> Result<Vec<u8>>;

    fn decode(&self, bytes: &[u8]) -> Result<T>;

    fn encode_list(&self, values: &[T]) -> Result<Vec<u8>>;

    fn decode_list(&self, bytes: &[u8]) -> Result<Vec<T>>;
}

/// JSON codec backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl<T> Codec<T> for JsonCodec
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes)
            .map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
    }

    fn encode_list(&self, values: &[T]) -> Result<Vec<u8>> {
        serde_json::to_vec(values).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
    }

    fn decode_list(&self, bytes: &[u8]) -> Result<Vec<T>> {
        serde_json::from_slice(bytes)
            .map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
    }
}
