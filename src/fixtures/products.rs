//! Product Fixtures

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    products::{Product, ProductId, WeightTier, WeightTiers},
    tags::ProductTags,
};

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product identifier
    pub id: String,

    /// URL slug
    pub slug: String,

    /// Product name
    pub name: String,

    /// Category identifier
    pub category: String,

    /// Product tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Base price (e.g., "850 INR")
    pub price: String,

    /// Pre-sale price (e.g., "2800 INR")
    #[serde(default)]
    pub original_price: Option<String>,

    /// Image paths
    #[serde(default)]
    pub images: Vec<String>,

    /// Average rating
    pub rating: Decimal,

    /// Number of reviews
    pub reviews_count: u32,

    /// Long description
    #[serde(default)]
    pub description: String,

    /// Ingredients list
    #[serde(default)]
    pub ingredients: String,

    /// Shelf life notes
    #[serde(default)]
    pub shelf_life: String,

    /// Storage instructions
    #[serde(default)]
    pub storage: String,

    /// Weight tiers, default first
    pub weights: Vec<WeightTierFixture>,

    /// Best seller flag
    #[serde(default)]
    pub best_seller: bool,

    /// Giftable flag
    #[serde(default)]
    pub giftable: bool,

    /// Sugar-free flag
    #[serde(default)]
    pub sugar_free: bool,

    /// Vegan flag
    #[serde(default)]
    pub vegan: bool,
}

/// Weight Tier Fixture
#[derive(Debug, Deserialize)]
pub struct WeightTierFixture {
    /// Tier label (e.g., "250g")
    pub label: String,

    /// Tier price (e.g., "850 INR")
    pub price: String,
}

impl TryFrom<ProductFixture> for Product {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let tiers = fixture
            .weights
            .into_iter()
            .map(|tier| Ok(WeightTier::new(tier.label, parse_price(&tier.price)?)))
            .collect::<Result<Vec<_>, FixtureError>>()?;

        let weights =
            WeightTiers::new(tiers).ok_or_else(|| FixtureError::NoWeights(fixture.id.clone()))?;

        let original_price = fixture
            .original_price
            .as_deref()
            .map(parse_price)
            .transpose()?;

        Ok(Product {
            id: ProductId::new(fixture.id),
            slug: fixture.slug,
            name: fixture.name,
            category: fixture.category,
            tags: ProductTags::new(fixture.tags),
            price: parse_price(&fixture.price)?,
            original_price,
            images: fixture.images,
            rating: fixture.rating,
            reviews_count: fixture.reviews_count,
            description: fixture.description,
            ingredients: fixture.ingredients,
            shelf_life: fixture.shelf_life,
            storage: fixture.storage,
            weights,
            is_best_seller: fixture.best_seller,
            is_giftable: fixture.giftable,
            is_sugar_free: fixture.sugar_free,
            is_vegan: fixture.vegan,
            position: 0,
        })
    }
}

/// Parse a price string (e.g., "850 INR") into a rupee amount.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", if the amount is
/// not a non-negative decimal, or if the currency is not INR.
pub fn parse_price(s: &str) -> Result<Decimal, FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    if currency_code != "INR" {
        return Err(FixtureError::UnknownCurrency(currency_code.to_string()));
    }

    Ok(amount)
}
