//! Bootstrap for the product catalog database.
//!
//! Brings a document database to its initial state in one pass:
//!
//! 1. select the target database
//! 2. create the `products`, `categories` and `inventory` collections
//! 3. create the catalog indexes
//! 4. bulk-insert the seed categories
//! 5. print a completion message
//!
//! The store is passed in explicitly, so the same procedure runs against
//! `MongoDB` or the in-memory store.
//!
//! # Example
//!
//! ```
//! use catalog_seed::{run, BootstrapPlan, SeedPolicy};
//! use catalog_seed_store::MemoryStore;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new("neocommercepay_products");
//! let report = run(&store, &BootstrapPlan::catalog(SeedPolicy::Always)).await?;
//!
//! assert_eq!(report.created_collections(), 3);
//! assert_eq!(report.inserted_categories.len(), 3);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod verify;

pub use bootstrap::{
    run, run_and_report, BootstrapPlan, BootstrapReport, SeedPolicy, COMPLETION_MESSAGE,
};
pub use config::BootstrapConfig;
pub use error::{BootstrapError, Result, Step};
pub use verify::{verify, VerifyReport};
