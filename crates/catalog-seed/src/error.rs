//! Bootstrap error types.

use std::fmt;

use catalog_seed_core::CoreError;
use catalog_seed_store::StoreError;

/// Result type for bootstrap operations.
pub type Result<T> = std::result::Result<T, BootstrapError>;

/// A step of the bootstrap procedure, used to report where it halted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Creating a collection.
    CreateCollection,
    /// Creating an index.
    CreateIndex,
    /// Bulk-inserting seed categories.
    SeedCategories,
    /// Reading back collections and indexes.
    Verify,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateCollection => "create-collection",
            Self::CreateIndex => "create-index",
            Self::SeedCategories => "seed-categories",
            Self::Verify => "verify",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while bootstrapping the catalog database.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// A store operation failed; the procedure halted at `step`.
    #[error("bootstrap step `{step}` failed: {source}")]
    Step {
        /// The step that failed.
        step: Step,
        /// The underlying store error.
        #[source]
        source: StoreError,
    },

    /// Could not connect to the database.
    #[error("connection failed: {0}")]
    Connection(#[source] StoreError),

    /// Seed documents could not be prepared.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The completion message could not be written.
    #[error("failed to write completion message: {0}")]
    Io(#[from] std::io::Error),
}

impl BootstrapError {
    /// Attach the failing step to a store error.
    #[must_use]
    pub fn at(step: Step) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Step { step, source }
    }

    /// The step the procedure halted at, if a store step failed.
    #[must_use]
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::Step { step, .. } => Some(*step),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_error_message() {
        let err = BootstrapError::at(Step::CreateIndex)(StoreError::IndexConflict {
            collection: "products".into(),
            name: "price_1".into(),
        });

        assert_eq!(err.step(), Some(Step::CreateIndex));
        assert_eq!(
            err.to_string(),
            "bootstrap step `create-index` failed: index conflict in products: price_1"
        );
    }
}
