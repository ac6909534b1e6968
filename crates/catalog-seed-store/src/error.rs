//! Error types for catalog storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Could not reach or configure the database server.
    #[error("connection error: {0}")]
    Connection(String),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// The collection does not exist.
    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    /// A unique index rejected a document.
    #[error("duplicate key in {collection} for index {index}")]
    DuplicateKey {
        /// The collection written to.
        collection: String,
        /// The index that rejected the write.
        index: String,
    },

    /// An index with the same name or role exists with different options.
    #[error("index conflict in {collection}: {name}")]
    IndexConflict {
        /// The collection the index was declared on.
        collection: String,
        /// The declared index name.
        name: String,
    },

    /// The index declaration is unusable.
    #[error("invalid index: {0}")]
    InvalidIndex(String),
}
