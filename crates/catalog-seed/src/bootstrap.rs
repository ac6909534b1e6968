//! The bootstrap procedure.
//!
//! Runs a fixed, ordered sequence of administrative calls against a store:
//! create collections, create indexes, bulk-insert seed categories. Steps are
//! not transactional. The first failure halts the procedure and whatever was
//! done before it stays done.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use bson::{doc, Bson, Document};
use catalog_seed_core::{
    all_collections, all_indexes, collection, CategorySeed, IndexSpec, CATEGORY_SEEDS,
};
use catalog_seed_store::{CollectionStatus, Store};
use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::error::{BootstrapError, Result, Step};

/// Line written to stdout once every step has succeeded.
pub const COMPLETION_MESSAGE: &str = "MongoDB collections and indexes created successfully";

/// How seed categories are inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedPolicy {
    /// Insert every seed category unconditionally. Re-running duplicates them.
    #[default]
    Always,
    /// Insert only categories whose name is not present yet.
    IfAbsent,
}

impl FromStr for SeedPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "if-absent" | "if_absent" => Ok(Self::IfAbsent),
            other => Err(format!(
                "unknown seed policy '{other}' (expected 'always' or 'if-absent')"
            )),
        }
    }
}

impl fmt::Display for SeedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("always"),
            Self::IfAbsent => f.write_str("if-absent"),
        }
    }
}

/// Everything the procedure creates, in order.
#[derive(Debug, Clone)]
pub struct BootstrapPlan {
    /// Collections to create.
    pub collections: Vec<&'static str>,
    /// Indexes to create, each on its own collection.
    pub indexes: Vec<IndexSpec>,
    /// Categories to seed.
    pub categories: Vec<CategorySeed>,
    /// Seeding behavior.
    pub seed_policy: SeedPolicy,
}

impl BootstrapPlan {
    /// The product catalog plan: three collections, four indexes, three categories.
    #[must_use]
    pub fn catalog(seed_policy: SeedPolicy) -> Self {
        Self {
            collections: all_collections(),
            indexes: all_indexes(),
            categories: CATEGORY_SEEDS.to_vec(),
            seed_policy,
        }
    }
}

impl Default for BootstrapPlan {
    fn default() -> Self {
        Self::catalog(SeedPolicy::default())
    }
}

/// What a bootstrap run did.
#[derive(Debug, Clone, Default)]
pub struct BootstrapReport {
    /// Database the run targeted.
    pub database: String,
    /// Each planned collection with its creation outcome.
    pub collections: Vec<(String, CollectionStatus)>,
    /// Names of the indexes ensured, in order.
    pub indexes: Vec<String>,
    /// Ids of the inserted categories.
    pub inserted_categories: Vec<Bson>,
    /// Seed categories left out because they already existed.
    pub skipped_categories: Vec<String>,
}

impl BootstrapReport {
    /// Number of collections that were newly created.
    #[must_use]
    pub fn created_collections(&self) -> usize {
        self.collections
            .iter()
            .filter(|(_, status)| *status == CollectionStatus::Created)
            .count()
    }
}

/// Run the bootstrap against `store`.
///
/// # Errors
///
/// Returns `BootstrapError::Step` naming the first step that failed. Earlier
/// steps are not rolled back.
#[instrument(skip_all, fields(database = store.database_name(), seed_policy = %plan.seed_policy))]
pub async fn run<S: Store + ?Sized>(store: &S, plan: &BootstrapPlan) -> Result<BootstrapReport> {
    let mut report = BootstrapReport {
        database: store.database_name().to_string(),
        ..BootstrapReport::default()
    };
    info!(database = %report.database, "Bootstrapping catalog database");

    for &name in &plan.collections {
        let status = store
            .create_collection(name)
            .await
            .map_err(BootstrapError::at(Step::CreateCollection))?;
        match status {
            CollectionStatus::Created => info!(collection = name, "Collection created"),
            CollectionStatus::AlreadyExists => {
                info!(collection = name, "Collection already exists, leaving it");
            }
        }
        report.collections.push((name.to_string(), status));
    }

    for index in &plan.indexes {
        let name = store
            .create_index(index.collection, index)
            .await
            .map_err(BootstrapError::at(Step::CreateIndex))?;
        info!(
            collection = index.collection,
            index = %name,
            unique = index.unique,
            "Index ensured"
        );
        report.indexes.push(name);
    }

    let (documents, skipped) = seed_documents(store, plan).await?;
    report.skipped_categories = skipped;

    if documents.is_empty() {
        info!("All seed categories already present, skipping insert");
    } else {
        report.inserted_categories = store
            .insert_many(collection::CATEGORIES, documents)
            .await
            .map_err(BootstrapError::at(Step::SeedCategories))?;
        info!(
            inserted = report.inserted_categories.len(),
            "Seed categories inserted"
        );
    }

    Ok(report)
}

/// Run the bootstrap, then write [`COMPLETION_MESSAGE`] to `out`.
///
/// Nothing is written if any step fails.
///
/// # Errors
///
/// Returns the bootstrap error, or `BootstrapError::Io` if writing fails.
pub async fn run_and_report<S, W>(store: &S, plan: &BootstrapPlan, out: &mut W) -> Result<BootstrapReport>
where
    S: Store + ?Sized,
    W: Write + Send,
{
    let report = run(store, plan).await?;
    writeln!(out, "{COMPLETION_MESSAGE}")?;
    out.flush()?;
    Ok(report)
}

/// Build the seed documents to insert under the plan's policy, along with
/// the names left out.
async fn seed_documents<S: Store + ?Sized>(
    store: &S,
    plan: &BootstrapPlan,
) -> Result<(Vec<Document>, Vec<String>)> {
    let now = Utc::now();
    let mut documents = Vec::with_capacity(plan.categories.len());
    let mut skipped = Vec::new();

    for seed in &plan.categories {
        if plan.seed_policy == SeedPolicy::IfAbsent {
            let existing = store
                .count_documents(collection::CATEGORIES, doc! { "name": seed.name })
                .await
                .map_err(BootstrapError::at(Step::SeedCategories))?;
            if existing > 0 {
                debug!(category = seed.name, existing, "Category already seeded");
                skipped.push(seed.name.to_string());
                continue;
            }
        }
        documents.push(seed.to_category(now).to_document()?);
    }

    Ok((documents, skipped))
}
