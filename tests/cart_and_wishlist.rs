//! Integration tests for the cart and wishlist aggregates.

use confection::{
    cart::CartLineItem,
    fixtures::{DEFAULT_CATALOG, Fixture},
    products::ProductId,
    session::Session,
    storage::DocumentStore,
};
use rust_decimal::Decimal;
use testresult::TestResult;

#[test]
fn merge_update_and_remove_keep_totals_in_step() {
    let mut session = Session::ephemeral();
    let cart = session.cart_mut();

    cart.add(CartLineItem::new("1", "250g", 2, Decimal::from(850)));
    cart.add(CartLineItem::new("1", "250g", 3, Decimal::from(850)));
    cart.add(CartLineItem::new("2", "500g", 1, Decimal::from(850)));

    assert_eq!(cart.len(), 2);
    assert_eq!(cart.count(), 6);
    assert_eq!(cart.total(), Decimal::from(5100));

    cart.update_quantity(&ProductId::from("1"), "250g", 0);

    assert_eq!(cart.count(), 1);
    assert_eq!(cart.total(), Decimal::from(850));

    cart.remove(&ProductId::from("2"), "500g");

    assert!(cart.is_empty());
    assert_eq!(cart.total(), Decimal::ZERO);
}

#[test]
fn cart_view_skips_retired_products() -> TestResult {
    let catalog = Fixture::catalog(DEFAULT_CATALOG)?;
    let mut session = Session::ephemeral();

    session
        .cart_mut()
        .add(CartLineItem::new("1", "250g", 1, Decimal::from(850)));
    session
        .cart_mut()
        .add(CartLineItem::new("retired", "250g", 5, Decimal::from(100)));

    let view = session.cart().view(&catalog);

    assert_eq!(view.lines().len(), 1);
    assert_eq!(view.skipped(), 1);
    assert_eq!(view.subtotal(), Decimal::from(850));

    Ok(())
}

#[test]
fn wishlist_toggle_round_trips_through_storage() {
    let store = DocumentStore::in_memory();
    let mut session = Session::new(store.clone());
    let id = ProductId::from("7");

    assert!(session.wishlist_mut().toggle(&id));
    assert!(Session::new(store.clone()).wishlist().contains(&id));

    assert!(!session.wishlist_mut().toggle(&id));
    assert!(!Session::new(store).wishlist().contains(&id));
}

#[test]
fn adding_twice_keeps_first_entry() {
    let mut session = Session::ephemeral();
    let id = ProductId::from("1");

    session.wishlist_mut().add(&id);
    let first = session.wishlist().entries().to_vec();

    session.wishlist_mut().add(&id);

    assert_eq!(session.wishlist().entries(), first.as_slice());
}
