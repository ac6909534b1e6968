//! Read back the database and compare it with a plan.

use catalog_seed_store::Store;
use tracing::{debug, instrument};

use crate::bootstrap::BootstrapPlan;
use crate::error::{BootstrapError, Result, Step};

/// Differences between a plan and the database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    /// Planned collections that don't exist.
    pub missing_collections: Vec<String>,
    /// Planned indexes that don't exist, as `(collection, index)`.
    pub missing_indexes: Vec<(String, String)>,
    /// Indexes that exist with the wrong uniqueness, as `(collection, index)`.
    pub uniqueness_mismatches: Vec<(String, String)>,
}

impl VerifyReport {
    /// Whether the database matches the plan.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.missing_collections.is_empty()
            && self.missing_indexes.is_empty()
            && self.uniqueness_mismatches.is_empty()
    }
}

/// Check that every planned collection and index exists with the planned
/// uniqueness. Seed data is not checked.
///
/// # Errors
///
/// Returns `BootstrapError::Step` with `Step::Verify` if listing fails.
#[instrument(skip_all, fields(database = store.database_name()))]
pub async fn verify<S: Store + ?Sized>(store: &S, plan: &BootstrapPlan) -> Result<VerifyReport> {
    let mut report = VerifyReport::default();
    let existing = store
        .list_collection_names()
        .await
        .map_err(BootstrapError::at(Step::Verify))?;

    for &name in &plan.collections {
        let planned = plan.indexes.iter().filter(|idx| idx.collection == name);

        if !existing.iter().any(|c| c == name) {
            report.missing_collections.push(name.to_string());
            report
                .missing_indexes
                .extend(planned.map(|idx| (name.to_string(), idx.name())));
            continue;
        }

        let indexes = store
            .list_indexes(name)
            .await
            .map_err(BootstrapError::at(Step::Verify))?;
        debug!(collection = name, count = indexes.len(), "Listed indexes");

        for spec in planned {
            let spec_name = spec.name();
            match indexes.iter().find(|idx| idx.name == spec_name) {
                None => report.missing_indexes.push((name.to_string(), spec_name)),
                Some(found) if found.unique != spec.unique => {
                    report.uniqueness_mismatches.push((name.to_string(), spec_name));
                }
                Some(_) => {}
            }
        }
    }

    Ok(report)
}
