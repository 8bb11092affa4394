//! Pure functions for serializing/deserializing cache projections to/from bytes.
//!
//! Projections are stored as JSON so they stay readable with `redis-cli`.

use std::collections::{HashMap, HashSet};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{MovieStats, ReviewStats};

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

fn to_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

/// Serializes a likes projection (movie_id -> rating).
pub fn serialize_likes(likes: &HashMap<Uuid, u8>) -> Result<Vec<u8>> {
    to_bytes(likes)
}

/// Deserializes a likes projection.
pub fn deserialize_likes(bytes: &[u8]) -> Result<HashMap<Uuid, u8>> {
    from_bytes(bytes)
}

/// Serializes a bookmarks projection.
pub fn serialize_bookmarks(bookmarks: &HashSet<Uuid>) -> Result<Vec<u8>> {
    to_bytes(bookmarks)
}

/// Deserializes a bookmarks projection.
pub fn deserialize_bookmarks(bytes: &[u8]) -> Result<HashSet<Uuid>> {
    from_bytes(bytes)
}

/// Serializes movie statistics.
pub fn serialize_movie_stats(stats: &MovieStats) -> Result<Vec<u8>> {
    to_bytes(stats)
}

/// Deserializes movie statistics.
pub fn deserialize_movie_stats(bytes: &[u8]) -> Result<MovieStats> {
    from_bytes(bytes)
}

/// Serializes review statistics.
pub fn serialize_review_stats(stats: &ReviewStats) -> Result<Vec<u8>> {
    to_bytes(stats)
}

/// Deserializes review statistics.
pub fn deserialize_review_stats(bytes: &[u8]) -> Result<ReviewStats> {
    from_bytes(bytes)
}
