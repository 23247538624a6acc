//! Session
//!
//! One shopper's storefront state: the cart, wishlist and preferences aggregates, all
//! persisted through a single [`DocumentStore`]. Construct it once and pass references to
//! whatever needs it.

use crate::{
    cart::Cart,
    checkout::{Checkout, CheckoutError},
    preferences::Preferences,
    storage::DocumentStore,
    wishlist::Wishlist,
};

/// Storefront session
#[derive(Debug)]
pub struct Session {
    store: DocumentStore,
    cart: Cart,
    wishlist: Wishlist,
    preferences: Preferences,
}

impl Session {
    /// Restore every aggregate from the store.
    #[must_use]
    pub fn new(store: DocumentStore) -> Self {
        Self {
            cart: Cart::load(store.clone()),
            wishlist: Wishlist::load(store.clone()),
            preferences: Preferences::load(store.clone()),
            store,
        }
    }

    /// Session that keeps nothing between runs.
    #[must_use]
    pub fn ephemeral() -> Self {
        Self::new(DocumentStore::in_memory())
    }

    /// The backing document store.
    #[must_use]
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Cart
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Cart, for mutation
    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Wishlist
    #[must_use]
    pub fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    /// Wishlist, for mutation
    pub fn wishlist_mut(&mut self) -> &mut Wishlist {
        &mut self.wishlist
    }

    /// Preferences
    #[must_use]
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Preferences, for mutation
    pub fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.preferences
    }

    /// Start a checkout for the current cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines.
    pub fn begin_checkout(&self) -> Result<Checkout, CheckoutError> {
        Checkout::begin(&self.cart)
    }

    /// Re-read every aggregate from storage, discarding in-memory state.
    pub fn reload(&mut self) {
        self.cart.reload();
        self.wishlist.reload();
        self.preferences.reload();
    }
}
