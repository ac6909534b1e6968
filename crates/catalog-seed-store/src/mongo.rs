//! `MongoDB` storage implementation.
//!
//! This module provides the `MongoStore` implementation of the `Store` trait.
//! Server error codes are mapped onto `StoreError` so callers never match on
//! driver types.

use async_trait::async_trait;
use bson::{doc, Bson, Document};
use catalog_seed_core::IndexSpec;
use futures::TryStreamExt;
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use tracing::{debug, instrument};

use crate::error::{Result, StoreError};
use crate::{CollectionStatus, IndexDescription, Store};

/// Server error codes the store gives meaning to.
mod code {
    pub const NAMESPACE_NOT_FOUND: i32 = 26;
    pub const NAMESPACE_EXISTS: i32 = 48;
    pub const INDEX_OPTIONS_CONFLICT: i32 = 85;
    pub const INDEX_KEY_SPECS_CONFLICT: i32 = 86;
    pub const DUPLICATE_KEY: i32 = 11000;
}

/// MongoDB-backed storage implementation.
#[derive(Debug, Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Connect to the server at `uri` and bind to `database`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URI is invalid or the server does not answer a ping.
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        Self::connect_with_app_name(uri, database, None).await
    }

    /// Like [`MongoStore::connect`], reporting `app_name` to the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the URI is invalid or the server does not answer a ping.
    #[instrument(skip(uri))]
    pub async fn connect_with_app_name(
        uri: &str,
        database: &str,
        app_name: Option<&str>,
    ) -> Result<Self> {
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        if let Some(name) = app_name {
            options.app_name = Some(name.to_string());
        }

        let client =
            Client::with_options(options).map_err(|e| StoreError::Connection(e.to_string()))?;
        let store = Self::from_database(client.database(database));

        store
            .database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        debug!(database, "Connected to MongoDB");
        Ok(store)
    }

    /// Wrap an already-selected database handle.
    #[must_use]
    pub fn from_database(database: Database) -> Self {
        Self { database }
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

/// Server error code carried by a command or single write failure.
fn server_code(err: &MongoError) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Command(command) => Some(command.code),
        ErrorKind::Write(WriteFailure::WriteError(write)) => Some(write.code),
        ErrorKind::InsertMany(failure) => failure
            .write_errors
            .as_ref()
            .and_then(|errors| errors.first())
            .map(|e| e.code),
        _ => None,
    }
}

/// Pull the index name out of an `E11000 duplicate key error` message.
fn duplicate_key_index(message: &str) -> String {
    message
        .split_once("index: ")
        .and_then(|(_, rest)| rest.split_whitespace().next())
        .unwrap_or("unknown")
        .to_string()
}

fn map_error(err: MongoError, collection: &str) -> StoreError {
    match server_code(&err) {
        Some(code::DUPLICATE_KEY) => StoreError::DuplicateKey {
            collection: collection.to_string(),
            index: duplicate_key_index(&err.to_string()),
        },
        Some(code::NAMESPACE_NOT_FOUND) => StoreError::CollectionNotFound(collection.to_string()),
        _ => StoreError::Database(err.to_string()),
    }
}

#[async_trait]
impl Store for MongoStore {
    fn database_name(&self) -> &str {
        self.database.name()
    }

    async fn create_collection(&self, name: &str) -> Result<CollectionStatus> {
        match self.database.create_collection(name).await {
            Ok(()) => Ok(CollectionStatus::Created),
            Err(e) if server_code(&e) == Some(code::NAMESPACE_EXISTS) => {
                debug!(collection = name, "Collection already exists");
                Ok(CollectionStatus::AlreadyExists)
            }
            Err(e) => Err(map_error(e, name)),
        }
    }

    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<String> {
        if index.fields.is_empty() {
            return Err(StoreError::InvalidIndex(format!(
                "index on {collection} has no keys"
            )));
        }

        let name = index.name();
        let model = IndexModel::builder()
            .keys(index.keys())
            .options(
                IndexOptions::builder()
                    .name(name.clone())
                    .unique(index.unique)
                    .build(),
            )
            .build();

        match self.collection(collection).create_index(model).await {
            Ok(result) => Ok(result.index_name),
            Err(e) => match server_code(&e) {
                Some(code::INDEX_OPTIONS_CONFLICT | code::INDEX_KEY_SPECS_CONFLICT) => {
                    Err(StoreError::IndexConflict {
                        collection: collection.to_string(),
                        name,
                    })
                }
                _ => Err(map_error(e, collection)),
            },
        }
    }

    async fn list_collection_names(&self) -> Result<Vec<String>> {
        self.database
            .list_collection_names()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    async fn list_indexes(&self, collection: &str) -> Result<Vec<IndexDescription>> {
        let cursor = self
            .collection(collection)
            .list_indexes()
            .await
            .map_err(|e| map_error(e, collection))?;
        let models: Vec<IndexModel> = cursor
            .try_collect()
            .await
            .map_err(|e| map_error(e, collection))?;

        Ok(models
            .into_iter()
            .map(|model| {
                let (name, unique) = model.options.map_or((None, None), |o| (o.name, o.unique));
                IndexDescription {
                    name: name.unwrap_or_default(),
                    keys: model.keys,
                    unique: unique.unwrap_or(false),
                }
            })
            .collect())
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<Bson> {
        self.collection(collection)
            .insert_one(document)
            .await
            .map(|result| result.inserted_id)
            .map_err(|e| map_error(e, collection))
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<Vec<Bson>> {
        let result = self
            .collection(collection)
            .insert_many(documents)
            .await
            .map_err(|e| map_error(e, collection))?;

        let mut ids: Vec<(usize, Bson)> = result.inserted_ids.into_iter().collect();
        ids.sort_by_key(|(position, _)| *position);
        Ok(ids.into_iter().map(|(_, id)| id).collect())
    }

    async fn count_documents(&self, collection: &str, filter: Document) -> Result<u64> {
        self.collection(collection)
            .count_documents(filter)
            .await
            .map_err(|e| map_error(e, collection))
    }
}
