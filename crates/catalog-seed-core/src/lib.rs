//! Core declarations for the product catalog database.
//!
//! This crate holds everything the bootstrap procedure needs to know about the
//! catalog schema, expressed as constants rather than inline literals:
//!
//! - **Schema**: database name, collection names, index declarations
//! - **Seed data**: the baseline categories inserted at setup time
//! - **Documents**: `Category`, `Product`, `InventoryRecord`
//!
//! # Indexes
//!
//! | Collection  | Keys                                   | Unique |
//! |-------------|----------------------------------------|--------|
//! | `products`  | `name` (text), `description` (text)    | no     |
//! | `products`  | `categoryId` (ascending)               | no     |
//! | `products`  | `price` (ascending)                    | no     |
//! | `inventory` | `productId` (ascending)                | yes    |

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod documents;
pub mod error;
pub mod schema;
pub mod seed;

pub use documents::{Category, InventoryRecord, Product};
pub use error::{CoreError, Result};
pub use schema::{
    all_collections, all_indexes, collection, index, IndexField, IndexKind, IndexSpec,
    DEFAULT_DATABASE,
};
pub use seed::{seed_categories, CategorySeed, CATEGORY_SEEDS};
