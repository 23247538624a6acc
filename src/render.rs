//! Render
//!
//! Plain-text tables for terminals and logs: catalog listings, the cart and order summaries.

use std::io;

use rust_decimal::Decimal;
use rusty_money::{
    Money, MoneyError,
    iso::{self, Currency},
};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::CartView,
    checkout::OrderConfirmation,
    pricing::{OrderSummary, PricingError, to_minor},
    products::Product,
};

/// Errors that can occur while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// A price could not be converted for display.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Write a product listing: name, category, price, rating and tags.
///
/// # Errors
///
/// Returns an error if a price cannot be formatted or the output cannot be written.
pub fn write_catalog<'a>(
    mut out: impl io::Write,
    products: impl IntoIterator<Item = &'a Product>,
) -> Result<(), RenderError> {
    let mut builder = Builder::default();

    builder.push_record(["", "Item", "Category", "Price", "Rating", "Reviews", "Tags"]);

    for (idx, product) in products.into_iter().enumerate() {
        let price = match product.percent_off() {
            Some(percent) => format!("{} (-{percent}%)", rupees(product.price)?),
            None => rupees(product.price)?.to_string(),
        };

        builder.push_record([
            format!("#{:<3}", idx + 1),
            product.name.clone(),
            product.category.clone(),
            price,
            format!("{:.1}", product.rating),
            product.reviews_count.to_string(),
            product.tags.iter().collect::<Vec<_>>().join(", "),
        ]);
    }

    write_table(&mut out, builder, 3..6)
}

/// Write the resolved cart lines followed by the item count and subtotal.
///
/// # Errors
///
/// Returns an error if a price cannot be formatted or the output cannot be written.
pub fn write_cart(mut out: impl io::Write, view: &CartView<'_>) -> Result<(), RenderError> {
    let mut builder = Builder::default();

    builder.push_record(["", "Item", "Weight", "Qty", "Price", "Line Total"]);

    for (idx, resolved) in view.lines().iter().enumerate() {
        builder.push_record([
            format!("#{:<3}", idx + 1),
            resolved.product.name.clone(),
            resolved.line.weight.clone(),
            resolved.line.quantity.to_string(),
            rupees(resolved.line.price)?.to_string(),
            rupees(resolved.line.line_total())?.to_string(),
        ]);
    }

    write_table(&mut out, builder, 3..6)?;

    write_summary(
        &mut out,
        &[
            (" Items:", view.count().to_string()),
            (" Subtotal:", rupees(view.subtotal())?.to_string()),
        ],
    )
}

/// Write an order's price breakdown.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_order_summary(
    mut out: impl io::Write,
    summary: &OrderSummary,
) -> Result<(), RenderError> {
    let mut rows = vec![(" Subtotal:", summary.subtotal().to_string())];

    if let Some(coupon) = summary.coupon() {
        rows.push((" Discount:", format!("({coupon}) -{}", summary.discount())));
    }

    rows.push((" Delivery:", free_or(summary.delivery_fee())));

    if !summary.express_surcharge().is_zero() {
        rows.push((" Express:", summary.express_surcharge().to_string()));
    }

    rows.push((" Total:", summary.total().to_string()));

    write_summary(&mut out, &rows)
}

/// Write a placed order: reference, delivery details and price breakdown.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_confirmation(
    mut out: impl io::Write,
    confirmation: &OrderConfirmation,
) -> Result<(), RenderError> {
    write_summary(
        &mut out,
        &[
            (" Order ID:", format!("#{}", confirmation.order_id)),
            (" Deliver to:", confirmation.address.to_string()),
            (" Delivery:", confirmation.slot.label().to_string()),
            (" Payment:", confirmation.payment.label().to_string()),
        ],
    )?;

    write_order_summary(out, &confirmation.summary)
}

fn rupees(amount: Decimal) -> Result<Money<'static, Currency>, PricingError> {
    Ok(Money::from_minor(to_minor(amount)?, iso::INR))
}

fn free_or(amount: Money<'static, Currency>) -> String {
    if amount.is_zero() {
        "Free".to_string()
    } else {
        amount.to_string()
    }
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    numeric: std::ops::Range<usize>,
) -> Result<(), RenderError> {
    let mut table = builder.build();

    table.with(Theme::from(Style::modern_rounded()));
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(numeric), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| RenderError::IO)
}

fn write_summary(out: &mut impl io::Write, rows: &[(&str, String)]) -> Result<(), RenderError> {
    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = rows
        .iter()
        .map(|(_, value)| value.chars().count())
        .max()
        .unwrap_or(0);

    for (label, value) in rows {
        writeln!(out, "{label:<label_width$} {value:>value_width$}")
            .map_err(|_err| RenderError::IO)?;
    }

    writeln!(out).map_err(|_err| RenderError::IO)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::{
        cart::{Cart, CartLineItem},
        catalog::Catalog,
        checkout::DeliverySlot,
        pricing::PricingPolicy,
        products::test_support::product,
        storage::DocumentStore,
    };

    #[test]
    fn write_catalog_lists_products() -> TestResult {
        let mut kaju = product("1", 850, 2847);
        kaju.name = "Kaju Katli".to_string();
        kaju.original_price = Some(Decimal::from(1000));

        let mut out = Vec::new();
        write_catalog(&mut out, [&kaju])?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Kaju Katli"));
        assert!(output.contains("(-15%)"));
        assert!(output.contains("2847"));

        Ok(())
    }

    #[test]
    fn write_cart_renders_lines_and_subtotal() -> TestResult {
        let catalog = Catalog::new([product("1", 450, 10)], []);
        let mut cart = Cart::load(DocumentStore::in_memory());
        cart.add(CartLineItem::new("1", "500g", 2, Decimal::from(900)));

        let mut out = Vec::new();
        write_cart(&mut out, &cart.view(&catalog))?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Product 1"));
        assert!(output.contains("500g"));
        assert!(output.contains("Items:"));
        assert!(output.contains("Subtotal:"));

        Ok(())
    }

    #[test]
    fn write_order_summary_shows_coupon_and_free_delivery() -> TestResult {
        let policy = PricingPolicy::default();
        let summary = OrderSummary::compute(
            Decimal::from(1000),
            Some(policy.redeem("sweet10")?),
            DeliverySlot::Standard,
            &policy,
        )?;

        let mut out = Vec::new();
        write_order_summary(&mut out, &summary)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("(SWEET10)"));
        assert!(output.contains("Free"));
        assert!(output.contains("Total:"));
        assert!(!output.contains("Express:"));

        Ok(())
    }

    #[test]
    fn write_order_summary_shows_express_surcharge() -> TestResult {
        let summary = OrderSummary::compute(
            Decimal::from(500),
            None,
            DeliverySlot::Express,
            &PricingPolicy::default(),
        )?;

        let mut out = Vec::new();
        write_order_summary(&mut out, &summary)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Express:"));
        assert!(!output.contains("Discount:"));

        Ok(())
    }
}
