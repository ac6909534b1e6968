//! Document store layer for the catalog bootstrap.
//!
//! The bootstrap procedure talks to the database only through the [`Store`]
//! trait. Two implementations are provided:
//!
//! - [`MongoStore`]: a MongoDB database (feature `mongodb-backend`, on by default)
//! - [`MemoryStore`]: an in-process store emulating the server behavior the
//!   bootstrap relies on, for tests and dry runs
//!
//! # Example
//!
//! ```no_run
//! use catalog_seed_core::index;
//! use catalog_seed_store::{MongoStore, Store};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MongoStore::connect("mongodb://localhost:27017", "neocommercepay_products").await?;
//!
//! store.create_collection("inventory").await?;
//! let name = store.create_index("inventory", &index::INVENTORY_PRODUCT).await?;
//! assert_eq!(name, "productId_1");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod memory;
#[cfg(feature = "mongodb-backend")]
pub mod mongo;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
#[cfg(feature = "mongodb-backend")]
pub use mongo::MongoStore;

use async_trait::async_trait;
use bson::{Bson, Document};
use catalog_seed_core::IndexSpec;

/// Outcome of creating a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    /// The collection did not exist and was created.
    Created,
    /// A collection with that name already existed; nothing changed.
    AlreadyExists,
}

/// An index as reported back by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDescription {
    /// Index name.
    pub name: String,
    /// Key document as stored by the server.
    pub keys: Document,
    /// Whether the index rejects duplicate keys.
    pub unique: bool,
}

/// The storage trait defining the administrative operations the bootstrap needs.
///
/// A store is bound to a single database when it is opened.
#[async_trait]
pub trait Store: Send + Sync {
    /// Name of the database this store is bound to.
    fn database_name(&self) -> &str;

    // =========================================================================
    // Schema Operations
    // =========================================================================

    /// Create a collection.
    ///
    /// An existing collection of the same name is reported as
    /// [`CollectionStatus::AlreadyExists`] rather than as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn create_collection(&self, name: &str) -> Result<CollectionStatus>;

    /// Create an index and return its name.
    ///
    /// Creating an index identical to an existing one is a no-op.
    ///
    /// # Errors
    ///
    /// - `StoreError::IndexConflict` if an index of the same name differs.
    /// - `StoreError::DuplicateKey` if a unique index is built over duplicate data.
    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<String>;

    /// List collection names in the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_collection_names(&self) -> Result<Vec<String>>;

    /// List the indexes of a collection, including `_id_`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CollectionNotFound` if the collection doesn't exist.
    async fn list_indexes(&self, collection: &str) -> Result<Vec<IndexDescription>>;

    // =========================================================================
    // Document Operations
    // =========================================================================

    /// Insert a single document and return its `_id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateKey` if a unique index rejects the document.
    async fn insert_one(&self, collection: &str, document: Document) -> Result<Bson>;

    /// Insert documents in order as one bulk operation and return their ids.
    ///
    /// Documents before a failing one stay inserted.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateKey` if a unique index rejects a document.
    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<Vec<Bson>>;

    /// Count documents matching an equality filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn count_documents(&self, collection: &str, filter: Document) -> Result<u64>;
}
