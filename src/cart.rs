//! Cart
//!
//! The cart aggregate owns the session's line items. Every mutation persists the full list
//! through the [`DocumentStore`] before returning it. Totals are always computed from the
//! current lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    catalog::Catalog,
    products::{Product, ProductId},
    storage::{Document, DocumentStore},
};

/// One row in the cart, identified by `(product_id, weight)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Product being bought
    pub product_id: ProductId,

    /// Number of units, always positive for a stored line
    pub quantity: u32,

    /// Weight tier label
    pub weight: String,

    /// Unit price of the weight tier when it was added
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
}

impl CartLineItem {
    /// Create a line item.
    pub fn new(
        product_id: impl Into<ProductId>,
        weight: impl Into<String>,
        quantity: u32,
        price: Decimal,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            weight: weight.into(),
            price,
        }
    }

    /// Line item for a product's weight tier, or its default tier when `weight` is `None`.
    ///
    /// Returns `None` if the product has no tier with that label.
    pub fn for_product(product: &Product, weight: Option<&str>, quantity: u32) -> Option<Self> {
        let tier = match weight {
            Some(label) => product.weights.get(label)?,
            None => product.weights.default_tier(),
        };

        Some(Self::new(
            product.id.clone(),
            tier.label.clone(),
            quantity,
            tier.price,
        ))
    }

    /// Check whether this line has the given identity.
    pub fn is(&self, product_id: &ProductId, weight: &str) -> bool {
        self.product_id == *product_id && self.weight == weight
    }

    /// `price × quantity`, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// Sum of `price × quantity` over all lines, saturating at [`Decimal::MAX`].
///
/// A saturated total cannot be converted to minor units, so pricing it fails instead.
pub fn total(lines: &[CartLineItem]) -> Decimal {
    sum_line_totals(lines.iter())
}

fn sum_line_totals<'a>(lines: impl Iterator<Item = &'a CartLineItem>) -> Decimal {
    lines.fold(Decimal::ZERO, |acc, line| acc.saturating_add(line.line_total()))
}

/// Restore the line invariants on a loaded document.
///
/// Zero-quantity lines are dropped and lines sharing an identity are merged into the first.
fn normalize(loaded: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let before = loaded.len();
    let mut lines: Vec<CartLineItem> = Vec::with_capacity(before);

    for item in loaded.into_iter().filter(|line| line.quantity > 0) {
        if let Some(existing) = lines
            .iter_mut()
            .find(|line| line.is(&item.product_id, &item.weight))
        {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            lines.push(item);
        }
    }

    if lines.len() != before {
        warn!(before, after = lines.len(), "normalized stored cart lines");
    }

    lines
}

/// Sum of quantities over all lines.
pub fn count(lines: &[CartLineItem]) -> u64 {
    lines.iter().map(|line| u64::from(line.quantity)).sum()
}

/// Cart aggregate
#[derive(Debug)]
pub struct Cart {
    lines: Vec<CartLineItem>,
    store: DocumentStore,
}

impl Cart {
    /// Restore the cart from its persisted document.
    #[must_use]
    ///
    /// Zero-quantity lines are dropped and duplicate identities merged.
    pub fn load(store: DocumentStore) -> Self {
        let lines = normalize(store.load(Document::Cart));

        Self { lines, store }
    }

    /// Replace the in-memory lines with the persisted document.
    pub fn reload(&mut self) {
        self.lines = normalize(self.store.load(Document::Cart));
    }

    /// Current line items, in insertion order.
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    /// Add an item, merging its quantity into an existing line with the same identity.
    ///
    /// An item with quantity zero never creates a line.
    pub fn add(&mut self, item: CartLineItem) -> &[CartLineItem] {
        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|line| line.is(&item.product_id, &item.weight))
        {
            existing.quantity = existing.quantity.saturating_add(item.quantity);

            debug!(
                product_id = %item.product_id,
                weight = %item.weight,
                quantity = existing.quantity,
                "merged cart line"
            );
        } else if item.quantity > 0 {
            debug!(
                product_id = %item.product_id,
                weight = %item.weight,
                quantity = item.quantity,
                "added cart line"
            );

            self.lines.push(item);
        }

        self.persist()
    }

    /// Set the quantity of a line. Zero or negative quantities remove the line.
    ///
    /// Does nothing (but still persists) when no line matches.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        weight: &str,
        quantity: i64,
    ) -> &[CartLineItem] {
        if let Some(index) = self
            .lines
            .iter()
            .position(|line| line.is(product_id, weight))
        {
            if quantity <= 0 {
                self.lines.remove(index);
            } else if let Some(line) = self.lines.get_mut(index) {
                line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            }

            debug!(%product_id, weight, quantity, "updated cart line");
        }

        self.persist()
    }

    /// Remove the line with the given identity.
    pub fn remove(&mut self, product_id: &ProductId, weight: &str) -> &[CartLineItem] {
        self.lines.retain(|line| !line.is(product_id, weight));

        debug!(%product_id, weight, "removed cart line");

        self.persist()
    }

    /// Empty the cart and drop its persisted document.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.store.remove(Document::Cart);

        debug!("cleared cart");
    }

    /// Sum of `price × quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        total(&self.lines)
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        count(&self.lines)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Resolve the lines against a catalog for display and pricing.
    pub fn view<'a>(&'a self, catalog: &'a Catalog) -> CartView<'a> {
        CartView::new(&self.lines, catalog)
    }

    fn persist(&self) -> &[CartLineItem] {
        self.store.save(Document::Cart, &self.lines);

        &self.lines
    }
}

/// A cart line paired with its catalog product.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedLine<'a> {
    /// Catalog product
    pub product: &'a Product,

    /// Cart line
    pub line: &'a CartLineItem,
}

/// Cart lines resolved against the catalog.
///
/// Lines whose product is no longer in the catalog are skipped and excluded from the subtotal.
#[derive(Debug, Clone)]
pub struct CartView<'a> {
    lines: Vec<ResolvedLine<'a>>,
    skipped: usize,
}

impl<'a> CartView<'a> {
    /// Resolve `lines` against `catalog`.
    pub fn new(lines: &'a [CartLineItem], catalog: &'a Catalog) -> Self {
        let mut resolved = Vec::with_capacity(lines.len());
        let mut skipped = 0;

        for line in lines {
            if let Some(product) = catalog.get(&line.product_id) {
                resolved.push(ResolvedLine { product, line });
            } else {
                warn!(
                    product_id = %line.product_id,
                    "cart line references unknown product, skipped"
                );

                skipped += 1;
            }
        }

        Self {
            lines: resolved,
            skipped,
        }
    }

    /// Resolved lines, in cart order.
    pub fn lines(&self) -> &[ResolvedLine<'a>] {
        &self.lines
    }

    /// Number of lines that could not be resolved.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Subtotal over the resolved lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        sum_line_totals(self.lines.iter().map(|resolved| resolved.line))
    }

    /// Item count over the resolved lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines
            .iter()
            .map(|resolved| u64::from(resolved.line.quantity))
            .sum()
    }

    /// Check if no line resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use testresult::TestResult;

    use super::*;
    use crate::{
        products::test_support::product,
        storage::{KeyValueStore, MemoryStore, StorageKeys},
    };

    fn line(id: &str, weight: &str, quantity: u32, price: i64) -> CartLineItem {
        CartLineItem::new(id, weight, quantity, Decimal::from(price))
    }

    fn shared_cart() -> (Rc<MemoryStore>, Cart) {
        let memory = Rc::new(MemoryStore::default());
        let store = DocumentStore::from_shared(memory.clone(), StorageKeys::default());

        (memory, Cart::load(store))
    }

    #[test]
    fn add_same_identity_merges_quantities() {
        let mut cart = Cart::load(DocumentStore::in_memory());

        cart.add(line("1", "250g", 2, 850));
        let lines = cart.add(line("1", "250g", 3, 850));

        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().map(|l| l.quantity), Some(5));
    }

    #[test]
    fn add_different_weight_appends() {
        let mut cart = Cart::load(DocumentStore::in_memory());

        cart.add(line("1", "250g", 1, 850));
        cart.add(line("1", "500g", 1, 1650));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.count(), 2);
        assert_eq!(cart.total(), Decimal::from(2500));
    }

    #[test]
    fn add_zero_quantity_creates_no_line() {
        let mut cart = Cart::load(DocumentStore::in_memory());

        cart.add(line("1", "250g", 0, 850));

        assert!(cart.is_empty());
    }

    #[test]
    fn update_quantity_to_zero_removes_line() {
        let mut cart = Cart::load(DocumentStore::in_memory());
        cart.add(line("1", "250g", 2, 850));
        cart.add(line("2", "500g", 1, 450));

        cart.update_quantity(&ProductId::from("1"), "250g", 0);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.count(), 1);
        assert_eq!(cart.total(), Decimal::from(450));
    }

    #[test]
    fn update_quantity_negative_removes_line() {
        let mut cart = Cart::load(DocumentStore::in_memory());
        cart.add(line("1", "250g", 2, 850));

        cart.update_quantity(&ProductId::from("1"), "250g", -3);

        assert!(cart.is_empty());
    }

    #[test]
    fn update_quantity_sets_value() {
        let mut cart = Cart::load(DocumentStore::in_memory());
        cart.add(line("1", "250g", 2, 850));

        cart.update_quantity(&ProductId::from("1"), "250g", 7);

        assert_eq!(cart.count(), 7);
    }

    #[test]
    fn update_quantity_missing_line_still_persists() -> TestResult {
        let (memory, mut cart) = shared_cart();

        cart.update_quantity(&ProductId::from("9"), "1kg", 3);

        assert_eq!(memory.get_item("balaji_sweets_cart")?.as_deref(), Some("[]"));

        Ok(())
    }

    #[test]
    fn remove_filters_matching_line() {
        let mut cart = Cart::load(DocumentStore::in_memory());
        cart.add(line("1", "250g", 1, 850));
        cart.add(line("1", "500g", 1, 1650));

        let lines = cart.remove(&ProductId::from("1"), "250g");

        assert_eq!(lines, &[line("1", "500g", 1, 1650)]);
    }

    #[test]
    fn mutations_persist_and_reload() {
        let store = DocumentStore::in_memory();
        let mut cart = Cart::load(store.clone());
        cart.add(line("3", "250g", 2, 450));

        let restored = Cart::load(store);

        assert_eq!(restored.lines(), cart.lines());
    }

    #[test]
    fn clear_removes_document() -> TestResult {
        let (memory, mut cart) = shared_cart();
        cart.add(line("1", "250g", 1, 850));

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
        assert_eq!(memory.get_item("balaji_sweets_cart")?, None);

        Ok(())
    }

    #[test]
    fn document_uses_storefront_field_names() -> TestResult {
        let (memory, mut cart) = shared_cart();

        cart.add(line("1", "250g", 2, 850));

        assert_eq!(
            memory.get_item("balaji_sweets_cart")?.as_deref(),
            Some(r#"[{"productId":"1","quantity":2,"weight":"250g","price":850}]"#)
        );

        Ok(())
    }

    #[test]
    fn for_product_uses_requested_or_default_tier() -> TestResult {
        let kaju = product("1", 850, 10);

        let default = CartLineItem::for_product(&kaju, None, 1).ok_or("default tier")?;
        let large = CartLineItem::for_product(&kaju, Some("500g"), 2).ok_or("500g tier")?;

        assert_eq!(default.weight, "250g");
        assert_eq!(default.price, Decimal::from(850));
        assert_eq!(large.price, Decimal::from(1700));
        assert!(CartLineItem::for_product(&kaju, Some("5kg"), 1).is_none());

        Ok(())
    }

    #[test]
    fn free_functions_sum_lines() {
        let lines = [line("1", "250g", 2, 100), line("2", "250g", 3, 50)];

        assert_eq!(total(&lines), Decimal::from(350));
        assert_eq!(count(&lines), 5);
        assert_eq!(total(&[]), Decimal::ZERO);
    }

    #[test]
    fn view_skips_unknown_products() {
        let catalog = Catalog::new([product("1", 100, 5)], []);
        let mut cart = Cart::load(DocumentStore::in_memory());
        cart.add(line("1", "250g", 2, 100));
        cart.add(line("gone", "250g", 4, 999));

        let view = cart.view(&catalog);

        assert_eq!(view.lines().len(), 1);
        assert_eq!(view.skipped(), 1);
        assert_eq!(view.subtotal(), Decimal::from(200));
        assert_eq!(view.count(), 2);
    }

    #[test]
    fn oversized_prices_saturate_instead_of_overflowing() -> TestResult {
        let memory = Rc::new(MemoryStore::default());
        memory.set_item(
            "balaji_sweets_cart",
            r#"[{"productId":"1","quantity":3,"weight":"250g","price":79228162514264337593543950335}]"#,
        )?;
        let store = DocumentStore::from_shared(memory, StorageKeys::default());

        let mut cart = Cart::load(store);
        cart.add(line("2", "250g", 1, 100));

        assert_eq!(cart.total(), Decimal::MAX);
        assert_eq!(
            cart.lines().first().map(CartLineItem::line_total),
            Some(Decimal::MAX)
        );

        let catalog = Catalog::new([product("1", 100, 5)], []);
        assert_eq!(cart.view(&catalog).subtotal(), Decimal::MAX);

        Ok(())
    }

    #[test]
    fn load_drops_zero_quantities_and_merges_duplicates() -> TestResult {
        let memory = Rc::new(MemoryStore::default());
        memory.set_item(
            "balaji_sweets_cart",
            r#"[{"productId":"1","quantity":0,"weight":"250g","price":850},{"productId":"1","quantity":2,"weight":"250g","price":850},{"productId":"2","quantity":1,"weight":"1kg","price":450},{"productId":"1","quantity":3,"weight":"250g","price":850}]"#,
        )?;
        let store = DocumentStore::from_shared(memory, StorageKeys::default());

        let cart = Cart::load(store);

        assert_eq!(
            cart.lines(),
            &[line("1", "250g", 5, 850), line("2", "1kg", 1, 450)]
        );
        assert!(cart.lines().iter().all(|l| l.quantity > 0));
        assert_eq!(cart.count(), 6);

        Ok(())
    }

    #[test]
    fn reload_of_all_zero_document_is_empty() -> TestResult {
        let (memory, mut cart) = shared_cart();
        cart.add(line("1", "250g", 1, 850));
        memory.set_item(
            "balaji_sweets_cart",
            r#"[{"productId":"1","quantity":0,"weight":"250g","price":850}]"#,
        )?;

        cart.reload();

        assert!(cart.is_empty());

        Ok(())
    }
}
