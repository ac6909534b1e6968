//! Database, collection and index declarations.
//!
//! Index names follow the server's default naming rule so that a declaration
//! can be matched against what the server reports back: every key is rendered
//! as `<field>_<kind>` and the parts are joined with `_`.

use bson::{Bson, Document};

/// Database the catalog lives in unless configured otherwise.
pub const DEFAULT_DATABASE: &str = "neocommercepay_products";

/// Name of the index every collection carries on `_id`.
pub const ID_INDEX_NAME: &str = "_id_";

/// Collection names.
pub mod collection {
    /// Product documents, searchable by name/description.
    pub const PRODUCTS: &str = "products";

    /// Product categories. Seeded at bootstrap.
    pub const CATEGORIES: &str = "categories";

    /// Stock records, at most one per product.
    pub const INVENTORY: &str = "inventory";
}

/// Returns all collection names in creation order.
#[must_use]
pub fn all_collections() -> Vec<&'static str> {
    vec![
        collection::PRODUCTS,
        collection::CATEGORIES,
        collection::INVENTORY,
    ]
}

/// How a single field participates in an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Ascending order (`1`).
    Ascending,
    /// Descending order (`-1`).
    Descending,
    /// Free-text search (`"text"`).
    Text,
}

impl IndexKind {
    /// The value used for this field in an index key document.
    #[must_use]
    pub fn key_value(self) -> Bson {
        match self {
            Self::Ascending => Bson::Int32(1),
            Self::Descending => Bson::Int32(-1),
            Self::Text => Bson::String("text".to_string()),
        }
    }

    fn name_suffix(self) -> &'static str {
        match self {
            Self::Ascending => "1",
            Self::Descending => "-1",
            Self::Text => "text",
        }
    }
}

/// One field of an index declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexField {
    /// Document field name.
    pub field: &'static str,
    /// Ordering or text.
    pub kind: IndexKind,
}

impl IndexField {
    /// An ascending key on `field`.
    #[must_use]
    pub const fn ascending(field: &'static str) -> Self {
        Self {
            field,
            kind: IndexKind::Ascending,
        }
    }

    /// A text key on `field`.
    #[must_use]
    pub const fn text(field: &'static str) -> Self {
        Self {
            field,
            kind: IndexKind::Text,
        }
    }
}

/// An index declared on a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    /// Collection the index belongs to.
    pub collection: &'static str,
    /// Keys, in order.
    pub fields: &'static [IndexField],
    /// Whether the index rejects duplicate keys.
    pub unique: bool,
}

impl IndexSpec {
    /// The key document passed to the server, e.g. `{ "price": 1 }`.
    #[must_use]
    pub fn keys(&self) -> Document {
        let mut keys = Document::new();
        for field in self.fields {
            keys.insert(field.field, field.kind.key_value());
        }
        keys
    }

    /// The server's default name for this index, e.g. `categoryId_1`.
    #[must_use]
    pub fn name(&self) -> String {
        self.fields
            .iter()
            .map(|f| format!("{}_{}", f.field, f.kind.name_suffix()))
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Whether any key is a text key.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.fields.iter().any(|f| f.kind == IndexKind::Text)
    }
}

/// Declared indexes.
pub mod index {
    use super::{collection, IndexField, IndexSpec};

    /// Free-text search over product name and description.
    pub const PRODUCTS_TEXT: IndexSpec = IndexSpec {
        collection: collection::PRODUCTS,
        fields: &[IndexField::text("name"), IndexField::text("description")],
        unique: false,
    };

    /// Filtering products by category.
    pub const PRODUCTS_CATEGORY: IndexSpec = IndexSpec {
        collection: collection::PRODUCTS,
        fields: &[IndexField::ascending("categoryId")],
        unique: false,
    };

    /// Range queries and sorting on price.
    pub const PRODUCTS_PRICE: IndexSpec = IndexSpec {
        collection: collection::PRODUCTS,
        fields: &[IndexField::ascending("price")],
        unique: false,
    };

    /// At most one inventory record per product.
    pub const INVENTORY_PRODUCT: IndexSpec = IndexSpec {
        collection: collection::INVENTORY,
        fields: &[IndexField::ascending("productId")],
        unique: true,
    };
}

/// Returns all index declarations in creation order.
#[must_use]
pub fn all_indexes() -> Vec<IndexSpec> {
    vec![
        index::PRODUCTS_TEXT,
        index::PRODUCTS_CATEGORY,
        index::PRODUCTS_PRICE,
        index::INVENTORY_PRODUCT,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_collections_in_order() {
        assert_eq!(all_collections(), vec!["products", "categories", "inventory"]);
    }

    #[test]
    fn test_text_index_keys() {
        assert_eq!(
            index::PRODUCTS_TEXT.keys(),
            doc! { "name": "text", "description": "text" }
        );
        assert!(index::PRODUCTS_TEXT.is_text());
    }

    #[test]
    fn test_default_index_names() {
        assert_eq!(index::PRODUCTS_TEXT.name(), "name_text_description_text");
        assert_eq!(index::PRODUCTS_CATEGORY.name(), "categoryId_1");
        assert_eq!(index::PRODUCTS_PRICE.name(), "price_1");
        assert_eq!(index::INVENTORY_PRODUCT.name(), "productId_1");
    }

    #[test]
    fn test_only_inventory_index_is_unique() {
        let unique: Vec<_> = all_indexes().into_iter().filter(|i| i.unique).collect();
        assert_eq!(unique, vec![index::INVENTORY_PRODUCT]);
        assert_eq!(unique[0].keys(), doc! { "productId": 1 });
    }

    #[test]
    fn test_descending_key() {
        const SPEC: IndexSpec = IndexSpec {
            collection: collection::PRODUCTS,
            fields: &[IndexField {
                field: "createdAt",
                kind: IndexKind::Descending,
            }],
            unique: false,
        };
        assert_eq!(SPEC.keys(), doc! { "createdAt": -1 });
        assert_eq!(SPEC.name(), "createdAt_-1");
    }
}
