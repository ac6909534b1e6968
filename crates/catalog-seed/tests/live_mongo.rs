//! Live MongoDB integration tests.
//!
//! These tests run against a real MongoDB server. Set `MONGODB_URI` to the
//! server's connection string. Each test works in a throwaway database that
//! is dropped afterwards.
//!
//! Run with: cargo test --test live_mongo -- --nocapture --ignored

#![cfg(feature = "mongodb-backend")]

use bson::{doc, oid::ObjectId};
use catalog_seed::{run, verify, BootstrapPlan, SeedPolicy};
use catalog_seed_core::{collection, InventoryRecord};
use catalog_seed_store::{CollectionStatus, MongoStore, Store, StoreError};
use chrono::Utc;

fn get_uri() -> String {
    std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
}

async fn scratch_database() -> mongodb::Database {
    let client = mongodb::Client::with_uri_str(get_uri())
        .await
        .expect("Failed to connect to MongoDB");
    client.database(&format!("catalog_seed_test_{}", ObjectId::new()))
}

#[tokio::test]
#[ignore] // Run with --ignored flag
async fn live_bootstrap_twice() {
    let database = scratch_database().await;
    let store = MongoStore::from_database(database.clone());
    let plan = BootstrapPlan::catalog(SeedPolicy::Always);

    let first = run(&store, &plan).await.expect("first run");
    let second = run(&store, &plan).await.expect("second run");

    println!("First run: {first:?}");
    println!("Second run: {second:?}");

    assert_eq!(first.created_collections(), 3);
    assert!(second
        .collections
        .iter()
        .all(|(_, status)| *status == CollectionStatus::AlreadyExists));
    assert_eq!(
        store
            .count_documents(collection::CATEGORIES, doc! {})
            .await
            .unwrap(),
        6
    );

    let check = verify(&store, &plan).await.expect("verify");
    assert!(check.is_clean(), "verify found differences: {check:?}");

    database.drop().await.expect("drop test database");
}

#[tokio::test]
#[ignore] // Run with --ignored flag
async fn live_inventory_product_id_is_unique() {
    let database = scratch_database().await;
    let store = MongoStore::from_database(database.clone());
    run(&store, &BootstrapPlan::default()).await.expect("bootstrap");

    let now = Utc::now();
    store
        .insert_one(
            collection::INVENTORY,
            InventoryRecord::new("product-1", 1, now).to_document().unwrap(),
        )
        .await
        .expect("first insert");
    let result = store
        .insert_one(
            collection::INVENTORY,
            InventoryRecord::new("product-1", 2, now).to_document().unwrap(),
        )
        .await;

    println!("Second insert: {result:?}");
    assert!(
        matches!(&result, Err(StoreError::DuplicateKey { index, .. }) if index == "productId_1"),
        "expected duplicate key on productId_1"
    );

    database.drop().await.expect("drop test database");
}
