//! Confection
//!
//! Confection is the catalog, cart, wishlist and checkout core of a sweets storefront:
//! an immutable product catalog with a filter/sort engine, persisted cart and wishlist
//! aggregates, browsing preferences and a simulated multi-step checkout.

pub mod carousel;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod fixtures;
pub mod observability;
pub mod preferences;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod render;
pub mod session;
pub mod storage;
pub mod tags;
pub mod wishlist;
