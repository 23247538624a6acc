//! Confection prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    carousel::{Autoplay, Carousel},
    cart::{Cart, CartLineItem, CartView, ResolvedLine},
    catalog::{Catalog, CatalogError, FilterState, PriceRange, SortKey},
    checkout::{
        Checkout, CheckoutError, CheckoutPhase, CheckoutStep, DeliverySlot, OrderConfirmation,
        OrderId, PaymentMethod, ShippingAddress,
    },
    config::{LogFormat, LoggingConfig, StorageConfig, StorefrontConfig},
    fixtures::{Fixture, FixtureError},
    observability::{ObservabilityError, init_logging},
    preferences::{Preferences, UserPreferences},
    pricing::{AppliedCoupon, CouponError, OrderSummary, PricingError, PricingPolicy},
    products::{Category, Product, ProductId, ProductKey, WeightTier, WeightTiers},
    render::RenderError,
    session::Session,
    storage::{Document, DocumentStore, FileStore, KeyValueStore, MemoryStore, StorageError},
    tags::ProductTags,
    wishlist::{Wishlist, WishlistEntry},
};
