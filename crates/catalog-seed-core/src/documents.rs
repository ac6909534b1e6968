//! Document shapes stored in the catalog collections.
//!
//! Field names are camelCase on the wire to match what the catalog service
//! reads and writes.

use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use bson::Document;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A product category, stored in `categories`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Generated identifier.
    #[serde(rename = "_id")]
    pub id: ObjectId,

    /// Display name, e.g. `Electronics`. Not unique.
    pub name: String,

    /// Short description.
    pub description: String,

    /// When the category was created.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    /// When the category was last updated.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a category with a fresh id and both timestamps set to `now`.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            description: description.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Convert to a BSON document for insertion.
    ///
    /// # Errors
    ///
    /// Returns an error if the category cannot be serialized.
    pub fn to_document(&self) -> Result<Document> {
        Ok(bson::to_document(self)?)
    }

    /// Read a category back from a stored document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not have the category shape.
    pub fn from_document(doc: Document) -> Result<Self> {
        Ok(bson::from_document(doc)?)
    }
}

/// A product, stored in `products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Generated identifier.
    #[serde(rename = "_id")]
    pub id: ObjectId,

    /// Product name (text indexed).
    pub name: String,

    /// Product description (text indexed).
    pub description: String,

    /// Unit price.
    pub price: f64,

    /// Owning category id (indexed).
    pub category_id: String,

    /// Denormalized category name.
    pub category_name: String,

    /// Units in stock.
    pub stock_quantity: i32,

    /// When the product was created.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Convert to a BSON document for insertion.
    ///
    /// # Errors
    ///
    /// Returns an error if the product cannot be serialized.
    pub fn to_document(&self) -> Result<Document> {
        Ok(bson::to_document(self)?)
    }
}

/// Stock for a single product, stored in `inventory`.
///
/// `product_id` is unique across the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    /// Generated identifier.
    #[serde(rename = "_id")]
    pub id: ObjectId,

    /// The product this record tracks.
    pub product_id: String,

    /// Total units on hand.
    pub quantity: i32,

    /// Units held by pending orders.
    pub reserved_quantity: i32,

    /// Units that can still be ordered.
    pub available_quantity: i32,

    /// When the record last changed.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub last_updated: DateTime<Utc>,
}

impl InventoryRecord {
    /// Create a record with nothing reserved.
    #[must_use]
    pub fn new(product_id: impl Into<String>, quantity: i32, now: DateTime<Utc>) -> Self {
        Self {
            id: ObjectId::new(),
            product_id: product_id.into(),
            quantity,
            reserved_quantity: 0,
            available_quantity: quantity,
            last_updated: now,
        }
    }

    /// Convert to a BSON document for insertion.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized.
    pub fn to_document(&self) -> Result<Document> {
        Ok(bson::to_document(self)?)
    }
}
