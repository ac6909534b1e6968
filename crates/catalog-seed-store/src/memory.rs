//! In-memory storage implementation.
//!
//! Emulates the parts of server behavior the bootstrap depends on:
//!
//! - collections are created implicitly by inserts and index builds
//! - creating an existing collection reports `AlreadyExists`
//! - every collection has a unique `_id_` index and documents get an
//!   `ObjectId` when inserted without one
//! - an identical index is a no-op, a same-named different index conflicts,
//!   and a collection holds at most one text index
//! - unique indexes are enforced on insert and when built over existing data

use std::collections::BTreeMap;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Bson, Document};
use catalog_seed_core::schema::ID_INDEX_NAME;
use catalog_seed_core::IndexSpec;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::{CollectionStatus, IndexDescription, Store};

#[derive(Debug)]
struct MemoryCollection {
    documents: Vec<Document>,
    indexes: Vec<IndexDescription>,
}

impl MemoryCollection {
    fn new() -> Self {
        Self {
            documents: Vec::new(),
            indexes: vec![IndexDescription {
                name: ID_INDEX_NAME.to_string(),
                keys: doc! { "_id": 1 },
                unique: true,
            }],
        }
    }

    fn has_text_index(&self) -> bool {
        self.indexes
            .iter()
            .any(|idx| idx.keys.values().any(|v| v.as_str() == Some("text")))
    }

    /// Reject `document` if any unique index already holds its key.
    fn check_unique(&self, collection: &str, document: &Document) -> Result<()> {
        for index in self.indexes.iter().filter(|idx| idx.unique) {
            let key = index_key(document, &index.keys);
            if self
                .documents
                .iter()
                .any(|existing| index_key(existing, &index.keys) == key)
            {
                return Err(StoreError::DuplicateKey {
                    collection: collection.to_string(),
                    index: index.name.clone(),
                });
            }
        }
        Ok(())
    }

    fn insert(&mut self, collection: &str, mut document: Document) -> Result<Bson> {
        if !document.contains_key("_id") {
            document.insert("_id", ObjectId::new());
        }
        self.check_unique(collection, &document)?;

        let id = document.get("_id").cloned().unwrap_or(Bson::Null);
        self.documents.push(document);
        Ok(id)
    }
}

/// Extract the values an index keys on. Missing fields key as null.
fn index_key(document: &Document, keys: &Document) -> Vec<Bson> {
    keys.keys()
        .map(|field| document.get(field).cloned().unwrap_or(Bson::Null))
        .collect()
}

fn matches_filter(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(field, expected)| document.get(field) == Some(expected))
}

/// In-memory [`Store`] bound to a single named database.
#[derive(Debug)]
pub struct MemoryStore {
    database: String,
    collections: RwLock<BTreeMap<String, MemoryCollection>>,
}

impl MemoryStore {
    /// Create an empty store for `database`.
    #[must_use]
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collections: RwLock::new(BTreeMap::new()),
        }
    }

    /// Snapshot of every document in a collection, in insertion order.
    ///
    /// Returns an empty list for a collection that doesn't exist.
    pub async fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|c| c.documents.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn database_name(&self) -> &str {
        &self.database
    }

    async fn create_collection(&self, name: &str) -> Result<CollectionStatus> {
        let mut collections = self.collections.write().await;
        if collections.contains_key(name) {
            debug!(collection = name, "Collection already exists");
            return Ok(CollectionStatus::AlreadyExists);
        }
        collections.insert(name.to_string(), MemoryCollection::new());
        Ok(CollectionStatus::Created)
    }

    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<String> {
        if index.fields.is_empty() {
            return Err(StoreError::InvalidIndex(format!(
                "index on {collection} has no keys"
            )));
        }

        let name = index.name();
        let keys = index.keys();

        let mut collections = self.collections.write().await;
        let coll = collections
            .entry(collection.to_string())
            .or_insert_with(MemoryCollection::new);

        if let Some(existing) = coll.indexes.iter().find(|idx| idx.name == name) {
            if existing.keys == keys && existing.unique == index.unique {
                debug!(collection, index = %name, "Index already exists");
                return Ok(name);
            }
            return Err(StoreError::IndexConflict {
                collection: collection.to_string(),
                name,
            });
        }

        if index.is_text() && coll.has_text_index() {
            return Err(StoreError::IndexConflict {
                collection: collection.to_string(),
                name,
            });
        }

        if index.unique {
            let mut seen: Vec<Vec<Bson>> = Vec::with_capacity(coll.documents.len());
            for document in &coll.documents {
                let key = index_key(document, &keys);
                if seen.contains(&key) {
                    return Err(StoreError::DuplicateKey {
                        collection: collection.to_string(),
                        index: name,
                    });
                }
                seen.push(key);
            }
        }

        coll.indexes.push(IndexDescription {
            name: name.clone(),
            keys,
            unique: index.unique,
        });
        Ok(name)
    }

    async fn list_collection_names(&self) -> Result<Vec<String>> {
        Ok(self.collections.read().await.keys().cloned().collect())
    }

    async fn list_indexes(&self, collection: &str) -> Result<Vec<IndexDescription>> {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|c| c.indexes.clone())
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<Bson> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_insert_with(MemoryCollection::new)
            .insert(collection, document)
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<Vec<Bson>> {
        let mut collections = self.collections.write().await;
        let coll = collections
            .entry(collection.to_string())
            .or_insert_with(MemoryCollection::new);

        let mut ids = Vec::with_capacity(documents.len());
        for document in documents {
            ids.push(coll.insert(collection, document)?);
        }
        Ok(ids)
    }

    async fn count_documents(&self, collection: &str, filter: Document) -> Result<u64> {
        let collections = self.collections.read().await;
        let count = collections.get(collection).map_or(0, |c| {
            c.documents
                .iter()
                .filter(|d| matches_filter(d, &filter))
                .count()
        });
        Ok(count as u64)
    }
}
