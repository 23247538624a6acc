//! Products

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use smallvec::SmallVec;

use crate::tags::ProductTags;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Public product identifier, as referenced by cart lines and wishlist entries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A purchasable size of a product ("250g", "1kg", ...) and its price in rupees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightTier {
    /// Display label, also the weight component of a cart line's identity.
    pub label: String,

    /// Price for this size.
    pub price: Decimal,
}

impl WeightTier {
    /// Create a weight tier.
    pub fn new(label: impl Into<String>, price: Decimal) -> Self {
        Self {
            label: label.into(),
            price,
        }
    }
}

/// Ordered, non-empty list of weight tiers. The first tier is the product's default size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightTiers {
    default: WeightTier,
    rest: SmallVec<[WeightTier; 2]>,
}

impl WeightTiers {
    /// Build tiers from a list, returning `None` when the list is empty.
    pub fn new(tiers: impl IntoIterator<Item = WeightTier>) -> Option<Self> {
        let mut tiers = tiers.into_iter();
        let default = tiers.next()?;

        Some(Self {
            default,
            rest: tiers.collect(),
        })
    }

    /// The default (first) tier.
    #[must_use]
    pub fn default_tier(&self) -> &WeightTier {
        &self.default
    }

    /// Find a tier by label.
    pub fn get(&self, label: &str) -> Option<&WeightTier> {
        self.iter().find(|tier| tier.label == label)
    }

    /// Iterate over the tiers in order.
    pub fn iter(&self) -> impl Iterator<Item = &WeightTier> {
        std::iter::once(&self.default).chain(self.rest.iter())
    }

    /// Number of tiers, always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Product
#[derive(Debug, Clone)]
pub struct Product {
    /// Product identifier
    pub id: ProductId,

    /// URL slug
    pub slug: String,

    /// Product name
    pub name: String,

    /// Category identifier
    pub category: String,

    /// Product tags
    pub tags: ProductTags,

    /// Base price, the price of the default weight tier
    pub price: Decimal,

    /// Pre-sale price, when the product is discounted
    pub original_price: Option<Decimal>,

    /// Image paths, primary image first
    pub images: Vec<String>,

    /// Average review rating out of 5
    pub rating: Decimal,

    /// Number of reviews
    pub reviews_count: u32,

    /// Long description
    pub description: String,

    /// Ingredients list
    pub ingredients: String,

    /// Shelf life notes
    pub shelf_life: String,

    /// Storage instructions
    pub storage: String,

    /// Purchasable sizes
    pub weights: WeightTiers,

    /// Shown in the best sellers collection
    pub is_best_seller: bool,

    /// Suitable as a gift
    pub is_giftable: bool,

    /// Made without sugar
    pub is_sugar_free: bool,

    /// Contains no animal products
    pub is_vegan: bool,

    /// Position in the catalog's natural order; later listings are newer.
    ///
    /// Set by [`Catalog::insert`](crate::catalog::Catalog::insert).
    pub position: usize,
}

impl Product {
    /// Whole-number percentage saved against the original price, if the product is on sale.
    pub fn percent_off(&self) -> Option<u32> {
        let original = self.original_price.filter(|price| *price > Decimal::ZERO)?;

        ((Decimal::ONE - self.price / original) * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
    }

    /// Primary image, if any.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Product category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Category identifier, matched exactly by the category filter
    pub id: String,

    /// Display name
    pub name: String,

    /// Icon glyph
    pub icon: String,

    /// Short description
    pub description: String,

    /// Representative image path
    pub image: String,
}

#[cfg(test)]
pub(crate) mod test_support {
    use rust_decimal::Decimal;

    use super::*;

    /// Minimal product for unit tests.
    pub(crate) fn product(id: &str, price: i64, reviews: u32) -> Product {
        let price = Decimal::from(price);

        Product {
            id: ProductId::from(id),
            slug: format!("product-{id}"),
            name: format!("Product {id}"),
            category: "milk-sweets".to_string(),
            tags: ProductTags::default(),
            price,
            original_price: None,
            images: Vec::new(),
            rating: Decimal::new(45, 1),
            reviews_count: reviews,
            description: String::new(),
            ingredients: String::new(),
            shelf_life: String::new(),
            storage: String::new(),
            weights: WeightTiers::new([
                WeightTier::new("250g", price),
                WeightTier::new("500g", price * Decimal::TWO),
            ])
            .unwrap_or_else(|| unreachable!("two tiers were supplied")),
            is_best_seller: false,
            is_giftable: false,
            is_sugar_free: false,
            is_vegan: false,
            position: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::{test_support::product, *};

    #[test]
    fn weight_tiers_reject_empty_list() {
        assert!(WeightTiers::new([]).is_none());
    }

    #[test]
    fn weight_tiers_keep_order_and_default() -> TestResult {
        let tiers = WeightTiers::new([
            WeightTier::new("250g", Decimal::from(850)),
            WeightTier::new("500g", Decimal::from(1650)),
            WeightTier::new("1kg", Decimal::from(3200)),
        ])
        .ok_or("expected tiers")?;

        assert_eq!(tiers.default_tier().label, "250g");
        assert_eq!(tiers.len(), 3);
        assert_eq!(
            tiers.get("1kg").map(|tier| tier.price),
            Some(Decimal::from(3200))
        );
        assert!(tiers.get("2kg").is_none());

        Ok(())
    }

    #[test]
    fn percent_off_rounds_to_whole_percent() {
        let mut gift_box = product("14", 2400, 10);
        gift_box.original_price = Some(Decimal::from(2800));

        assert_eq!(gift_box.percent_off(), Some(14));
    }

    #[test]
    fn percent_off_is_none_without_original_price() {
        assert_eq!(product("1", 850, 10).percent_off(), None);
    }

    #[test]
    fn product_id_serializes_as_plain_string() -> Result<(), serde_json::Error> {
        let id = ProductId::from("42");

        assert_eq!(serde_json::to_string(&id)?, "\"42\"");

        Ok(())
    }
}
