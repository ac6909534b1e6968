//! Baseline categories inserted at bootstrap.

use chrono::{DateTime, Utc};

use crate::documents::Category;

/// A category to seed, before it gets an id and timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySeed {
    /// Category name.
    pub name: &'static str,
    /// Category description.
    pub description: &'static str,
}

impl CategorySeed {
    /// Materialize the seed as a category created at `now`.
    #[must_use]
    pub fn to_category(&self, now: DateTime<Utc>) -> Category {
        Category::new(self.name, self.description, now)
    }
}

/// The seeded categories, in insertion order.
pub const CATEGORY_SEEDS: [CategorySeed; 3] = [
    CategorySeed {
        name: "Electronics",
        description: "Electronic devices and gadgets",
    },
    CategorySeed {
        name: "Clothing",
        description: "Apparel and fashion items",
    },
    CategorySeed {
        name: "Books",
        description: "Books and publications",
    },
];

/// Build every seed category with a fresh id, stamped with `now`.
#[must_use]
pub fn seed_categories(now: DateTime<Utc>) -> Vec<Category> {
    CATEGORY_SEEDS.iter().map(|seed| seed.to_category(now)).collect()
}
