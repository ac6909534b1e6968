//! Common test utilities for catalog-seed integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use async_trait::async_trait;
use bson::{doc, Bson, Document};
use catalog_seed::{BootstrapPlan, SeedPolicy};
use catalog_seed_core::{collection, Category, IndexSpec, DEFAULT_DATABASE};
use catalog_seed_store::{
    CollectionStatus, IndexDescription, MemoryStore, Result, Store, StoreError,
};

/// Test harness containing a fresh in-memory database and the catalog plan.
pub struct TestHarness {
    /// The store the bootstrap runs against.
    pub store: MemoryStore,
    /// The plan under test.
    pub plan: BootstrapPlan,
}

impl TestHarness {
    /// Create a harness with an empty database and the default seed policy.
    pub fn new() -> Self {
        Self::with_policy(SeedPolicy::Always)
    }

    /// Create a harness with an empty database and the given seed policy.
    pub fn with_policy(policy: SeedPolicy) -> Self {
        Self {
            store: MemoryStore::new(DEFAULT_DATABASE),
            plan: BootstrapPlan::catalog(policy),
        }
    }

    /// All stored categories, decoded.
    pub async fn categories(&self) -> Vec<Category> {
        self.store
            .documents(collection::CATEGORIES)
            .await
            .into_iter()
            .map(|d| Category::from_document(d).expect("category document"))
            .collect()
    }

    /// Number of stored categories named `name`.
    pub async fn count_named(&self, name: &str) -> u64 {
        self.store
            .count_documents(collection::CATEGORIES, doc! { "name": name })
            .await
            .expect("count categories")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Which store operation `FailingStore` rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    CreateCollection,
    CreateIndex,
    InsertMany,
}

/// A memory store that fails one kind of operation with a database error.
pub struct FailingStore {
    pub inner: MemoryStore,
    pub fail_on: FailOn,
}

impl FailingStore {
    pub fn new(fail_on: FailOn) -> Self {
        Self {
            inner: MemoryStore::new(DEFAULT_DATABASE),
            fail_on,
        }
    }

    fn check(&self, op: FailOn) -> Result<()> {
        if self.fail_on == op {
            Err(StoreError::Database(format!("injected failure on {op:?}")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Store for FailingStore {
    fn database_name(&self) -> &str {
        self.inner.database_name()
    }

    async fn create_collection(&self, name: &str) -> Result<CollectionStatus> {
        self.check(FailOn::CreateCollection)?;
        self.inner.create_collection(name).await
    }

    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<String> {
        self.check(FailOn::CreateIndex)?;
        self.inner.create_index(collection, index).await
    }

    async fn list_collection_names(&self) -> Result<Vec<String>> {
        self.inner.list_collection_names().await
    }

    async fn list_indexes(&self, collection: &str) -> Result<Vec<IndexDescription>> {
        self.inner.list_indexes(collection).await
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<Bson> {
        self.inner.insert_one(collection, document).await
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<Vec<Bson>> {
        self.check(FailOn::InsertMany)?;
        self.inner.insert_many(collection, documents).await
    }

    async fn count_documents(&self, collection: &str, filter: Document) -> Result<u64> {
        self.inner.count_documents(collection, filter).await
    }
}
