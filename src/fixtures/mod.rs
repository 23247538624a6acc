//! Fixtures
//!
//! Catalog data sets described in YAML, loaded from `<base>/catalog/<name>.yml`.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashSet;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::catalog::{Catalog, CatalogError};

pub mod categories;
pub mod products;

use self::{categories::CategoryFixture, products::ProductFixture};

/// Name of the catalog fixture shipped with the crate.
pub const DEFAULT_CATALOG: &str = "balaji-sweets";

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// A product declared no weight tiers
    #[error("Product {0} has no weight tiers")]
    NoWeights(String),

    /// A product references a category that is not declared
    #[error("Product {product} references unknown category {category}")]
    UnknownCategory {
        /// Product identifier
        product: String,
        /// Referenced category
        category: String,
    },

    /// Duplicate identifiers
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Catalog fixture file
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Categories in declaration order
    #[serde(default)]
    pub categories: Vec<CategoryFixture>,

    /// Products in listing order
    pub products: Vec<ProductFixture>,
}

impl CatalogFixture {
    /// Parse a catalog fixture from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Yaml`] if the text is not a valid catalog fixture.
    pub fn from_yaml(contents: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(contents)?)
    }

    /// Validate the fixture and build a [`Catalog`].
    ///
    /// # Errors
    ///
    /// Returns an error for malformed prices, empty weight tiers, unknown categories and
    /// duplicated identifiers.
    pub fn into_catalog(self) -> Result<Catalog, FixtureError> {
        let mut catalog = Catalog::default();

        for category in self.categories {
            catalog.add_category(category.into())?;
        }

        let known: FxHashSet<String> = catalog
            .categories()
            .iter()
            .map(|category| category.id.clone())
            .collect();

        for product_fixture in self.products {
            if !known.contains(&product_fixture.category) {
                return Err(FixtureError::UnknownCategory {
                    product: product_fixture.id,
                    category: product_fixture.category,
                });
            }

            catalog.insert(product_fixture.try_into()?)?;
        }

        Ok(catalog)
    }
}

/// Fixture
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,
}

impl Fixture {
    /// Create a fixture loader with the default base path
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_path(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures"))
    }

    /// Create a fixture loader with a custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Load a catalog from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the catalog is invalid.
    pub fn load_catalog(&self, name: &str) -> Result<Catalog, FixtureError> {
        let file_path = self.base_path.join("catalog").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let catalog = CatalogFixture::from_yaml(&contents)?.into_catalog()?;

        debug!(
            path = %file_path.display(),
            products = catalog.len(),
            categories = catalog.categories().len(),
            "catalog loaded"
        );

        Ok(catalog)
    }

    /// Load a named catalog from the default base path
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog fixture cannot be loaded.
    pub fn catalog(name: &str) -> Result<Catalog, FixtureError> {
        Self::new().load_catalog(name)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
