//! Catalog
//!
//! The read-only product catalog, in its natural listing order, with lookups and the
//! storefront's canned collections. Filtering and sorting live in [`filter`].

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use thiserror::Error;
use tracing::warn;

use crate::products::{Category, Product, ProductId, ProductKey};

pub mod filter;

pub use filter::{FilterState, PriceRange, SortKey, filter_and_sort, suggest};

/// Number of related products shown next to a product.
pub const RELATED_LIMIT: usize = 4;

/// Errors raised while assembling a catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Two products share an identifier.
    #[error("duplicate product id: {0}")]
    DuplicateProductId(ProductId),

    /// Two products share a slug.
    #[error("duplicate product slug: {0}")]
    DuplicateSlug(String),

    /// Two categories share an identifier.
    #[error("duplicate category id: {0}")]
    DuplicateCategory(String),
}

/// Catalog
#[derive(Debug, Default)]
pub struct Catalog {
    products: SlotMap<ProductKey, Product>,
    order: Vec<ProductKey>,
    by_id: FxHashMap<ProductId, ProductKey>,
    by_slug: FxHashMap<String, ProductKey>,
    categories: Vec<Category>,
}

impl Catalog {
    /// Build a catalog, skipping products or categories that repeat an identifier.
    pub fn new(
        products: impl IntoIterator<Item = Product>,
        categories: impl IntoIterator<Item = Category>,
    ) -> Self {
        let mut catalog = Self::default();

        for category in categories {
            if let Err(error) = catalog.add_category(category) {
                warn!(%error, "category skipped");
            }
        }

        for product in products {
            if let Err(error) = catalog.insert(product) {
                warn!(%error, "product skipped");
            }
        }

        catalog
    }

    /// Append a product to the end of the listing order.
    ///
    /// The product's `position` is set to its place in the listing.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the product's id or slug is already present.
    pub fn insert(&mut self, mut product: Product) -> Result<ProductKey, CatalogError> {
        if self.by_id.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProductId(product.id));
        }

        if self.by_slug.contains_key(&product.slug) {
            return Err(CatalogError::DuplicateSlug(product.slug));
        }

        product.position = self.order.len();

        let id = product.id.clone();
        let slug = product.slug.clone();
        let key = self.products.insert(product);

        self.order.push(key);
        self.by_id.insert(id, key);
        self.by_slug.insert(slug, key);

        Ok(key)
    }

    /// Register a category.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateCategory`] if the id is already registered.
    pub fn add_category(&mut self, category: Category) -> Result<(), CatalogError> {
        if self.category(&category.id).is_some() {
            return Err(CatalogError::DuplicateCategory(category.id));
        }

        self.categories.push(category);

        Ok(())
    }

    /// Iterate over products in listing order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.order.iter().filter_map(|key| self.products.get(*key))
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Look up a product by identifier.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.by_id.get(id).and_then(|key| self.products.get(*key))
    }

    /// Look up a product by its slug.
    pub fn by_slug(&self, slug: &str) -> Option<&Product> {
        self.by_slug.get(slug).and_then(|key| self.products.get(*key))
    }

    /// All categories, in declaration order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by identifier.
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Products flagged as best sellers.
    pub fn best_sellers(&self) -> Vec<&Product> {
        self.iter().filter(|product| product.is_best_seller).collect()
    }

    /// Products in a category.
    pub fn by_category(&self, category: &str) -> Vec<&Product> {
        self.iter()
            .filter(|product| product.category == category)
            .collect()
    }

    /// Products suitable as gifts.
    pub fn giftable(&self) -> Vec<&Product> {
        self.iter().filter(|product| product.is_giftable).collect()
    }

    /// Sugar-free products.
    pub fn sugar_free(&self) -> Vec<&Product> {
        self.iter().filter(|product| product.is_sugar_free).collect()
    }

    /// Up to `limit` other products from the same category, in listing order.
    pub fn related(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.iter()
            .filter(|other| other.category == product.category && other.id != product.id)
            .take(limit)
            .collect()
    }

    /// Filter and sort the whole catalog.
    pub fn search(&self, filter: &FilterState) -> Vec<&Product> {
        filter_and_sort(self.iter(), filter)
    }

    /// Search-as-you-type suggestions over the whole catalog.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<&Product> {
        suggest(self.iter(), query, limit)
    }
}
