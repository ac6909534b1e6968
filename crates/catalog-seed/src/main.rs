//! Catalog seed - one-shot bootstrap for the product catalog database.
//!
//! Logs go to stderr; stdout carries only the completion message.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_seed::{run_and_report, verify, BootstrapConfig, BootstrapError, BootstrapPlan};
use catalog_seed_store::MongoStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,catalog_seed=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration from environment
    let config = BootstrapConfig::from_env()?;

    tracing::info!(
        uri = %config.redacted_uri(),
        database = %config.database,
        seed_policy = %config.seed_policy,
        "Bootstrap configuration loaded"
    );

    let store = MongoStore::connect_with_app_name(
        &config.mongodb_uri,
        &config.database,
        Some(&config.app_name),
    )
    .await
    .map_err(BootstrapError::Connection)
    .inspect_err(|e| tracing::error!(error = %e, "Could not connect to MongoDB"))?;

    let plan = BootstrapPlan::catalog(config.seed_policy);

    let report = run_and_report(&store, &plan, &mut std::io::stdout())
        .await
        .inspect_err(|e| tracing::error!(error = %e, step = ?e.step(), "Bootstrap failed"))?;

    tracing::info!(
        created_collections = report.created_collections(),
        indexes = report.indexes.len(),
        inserted_categories = report.inserted_categories.len(),
        skipped_categories = report.skipped_categories.len(),
        "Bootstrap finished"
    );

    match verify(&store, &plan).await {
        Ok(check) if check.is_clean() => tracing::info!("Schema verified"),
        Ok(check) => tracing::warn!(
            missing_collections = ?check.missing_collections,
            missing_indexes = ?check.missing_indexes,
            uniqueness_mismatches = ?check.uniqueness_mismatches,
            "Schema does not match the plan"
        ),
        Err(e) => tracing::warn!(error = %e, "Schema verification failed"),
    }

    Ok(())
}
