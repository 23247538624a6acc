//! Catalog filtering and sorting
//!
//! [`filter_and_sort`] is a pure function of its inputs: every predicate in the
//! [`FilterState`] must pass, then the survivors are ordered by the sort key with a stable
//! sort, so products with equal keys keep their relative order.

use std::{cmp::Reverse, fmt, str::FromStr};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::products::Product;

/// Minimum trimmed query length, exclusive, before suggestions are produced.
pub const SUGGESTION_MIN_QUERY_LEN: usize = 1;

/// Number of suggestions shown by the search box.
pub const SUGGESTION_LIMIT: usize = 6;

/// Unknown sort key in a query string or form value.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort key: {0}")]
pub struct UnknownSortKey(pub String);

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Most reviewed first
    #[default]
    Popularity,

    /// Cheapest first
    PriceLow,

    /// Most expensive first
    PriceHigh,

    /// Highest rated first
    Rating,

    /// Latest listings first
    Newest,
}

impl SortKey {
    /// All sort keys, in the order the storefront offers them.
    pub const ALL: [SortKey; 5] = [
        SortKey::Popularity,
        SortKey::PriceLow,
        SortKey::PriceHigh,
        SortKey::Newest,
        SortKey::Rating,
    ];

    /// Wire name, as used in form values.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Popularity => "popularity",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::Rating => "rating",
            SortKey::Newest => "newest",
        }
    }

    /// Human readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Popularity => "Popularity",
            SortKey::PriceLow => "Price: Low to High",
            SortKey::PriceHigh => "Price: High to Low",
            SortKey::Rating => "Rating",
            SortKey::Newest => "Newest",
        }
    }

    fn sort(self, products: &mut [&Product]) {
        match self {
            SortKey::Popularity => products.sort_by_key(|p| Reverse(p.reviews_count)),
            SortKey::PriceLow => products.sort_by_key(|p| p.price),
            SortKey::PriceHigh => products.sort_by_key(|p| Reverse(p.price)),
            SortKey::Rating => products.sort_by_key(|p| Reverse(p.rating)),
            SortKey::Newest => {
                // Products with equal positions, such as ones never added to a catalog, fall
                // back to reverse input order.
                products.reverse();
                products.sort_by_key(|p| Reverse(p.position));
            }
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownSortKey(s.to_string()))
    }
}

/// Inclusive price bounds. A missing maximum is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceRange {
    min: Decimal,
    max: Option<Decimal>,
}

impl PriceRange {
    /// `[min, max]`
    #[must_use]
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    /// `[0, ∞)`
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// `[min, ∞)`
    #[must_use]
    pub fn at_least(min: Decimal) -> Self {
        Self { min, max: None }
    }

    /// Lower bound.
    #[must_use]
    pub fn min(&self) -> Decimal {
        self.min
    }

    /// Upper bound, if any.
    #[must_use]
    pub fn max(&self) -> Option<Decimal> {
        self.max
    }

    /// Check `min ≤ price ≤ max`.
    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        self.min <= price && self.max.is_none_or(|max| price <= max)
    }
}

/// Complete set of search, filter and sort criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Case-insensitive text matched against name, category and tags. Empty matches all.
    pub text_query: String,

    /// Exact category identifier
    pub category: Option<String>,

    /// Base price bounds
    pub price_range: PriceRange,

    /// Only sugar-free products
    pub sugar_free_only: bool,

    /// Only vegan products
    pub vegan_only: bool,

    /// Result ordering
    pub sort: SortKey,
}

impl FilterState {
    /// Restore the criteria carried in URL query parameters (`category`, `search`).
    ///
    /// Unknown parameters are ignored and everything else takes its default.
    pub fn from_query_params<'a>(params: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut state = Self::default();

        for (name, value) in params {
            match name {
                "category" if !value.is_empty() => state.category = Some(value.to_string()),
                "search" => state.text_query = value.to_string(),
                _ => {}
            }
        }

        state
    }

    /// URL query parameters for the criteria that are carried in the URL.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(2);

        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }

        if !self.text_query.is_empty() {
            params.push(("search", self.text_query.clone()));
        }

        params
    }

    /// Whether any predicate narrows the result. The sort key does not count.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.category.is_some()
            || !self.text_query.is_empty()
            || self.sugar_free_only
            || self.vegan_only
            || self.price_range != PriceRange::default()
    }

    /// Clear every criterion, including the sort key.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn matches(&self, product: &Product, query: Option<&str>) -> bool {
        query.is_none_or(|query| matches_query(product, query))
            && self
                .category
                .as_deref()
                .is_none_or(|category| product.category == category)
            && self.price_range.contains(product.price)
            && (!self.sugar_free_only || product.is_sugar_free)
            && (!self.vegan_only || product.is_vegan)
    }
}

/// Check whether a lowercase query is a substring of the product's name, category or any tag.
pub fn matches_query(product: &Product, lowercase_query: &str) -> bool {
    product.name.to_lowercase().contains(lowercase_query)
        || product.category.to_lowercase().contains(lowercase_query)
        || product.tags.any_contains_lowercase(lowercase_query)
}

/// Filter `products` by every predicate in `filter`, then order them by its sort key.
///
/// [`SortKey::Newest`] orders by descending [`Product::position`], and by reverse input
/// order among equal positions.
pub fn filter_and_sort<'a>(
    products: impl IntoIterator<Item = &'a Product>,
    filter: &FilterState,
) -> Vec<&'a Product> {
    let query = (!filter.text_query.is_empty()).then(|| filter.text_query.to_lowercase());

    let mut result: Vec<&Product> = products
        .into_iter()
        .filter(|product| filter.matches(product, query.as_deref()))
        .collect();

    filter.sort.sort(&mut result);

    result
}

/// Search-as-you-type suggestions: up to `limit` text matches in input order.
///
/// Queries of one character or less (after trimming) produce no suggestions.
pub fn suggest<'a>(
    products: impl IntoIterator<Item = &'a Product>,
    query: &str,
    limit: usize,
) -> Vec<&'a Product> {
    let trimmed = query.trim();

    if trimmed.chars().count() <= SUGGESTION_MIN_QUERY_LEN {
        return Vec::new();
    }

    let query = query.to_lowercase();

    products
        .into_iter()
        .filter(|product| matches_query(product, &query))
        .take(limit)
        .collect()
}
