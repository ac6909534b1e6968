//! Error types for catalog schema and seed handling.

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while preparing schema or seed documents.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A document could not be converted to BSON.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A document could not be read back from BSON.
    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl From<bson::ser::Error> for CoreError {
    fn from(err: bson::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<bson::de::Error> for CoreError {
    fn from(err: bson::de::Error) -> Self {
        Self::Deserialization(err.to_string())
    }
}
