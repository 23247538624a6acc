//! Checkout
//!
//! A four step wizard, `Address → Delivery → Payment → Review`, that ends in a terminal
//! placed state. Placing the order prices it, clears the cart and hands back a confirmation.
//! Nothing leaves the process; the order exists only in the returned confirmation.

use std::fmt;

use jiff::Timestamp;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cart::{Cart, CartLineItem},
    pricing::{AppliedCoupon, CouponError, OrderSummary, PricingError, PricingPolicy},
};

mod details;

pub use details::{DeliverySlot, PaymentMethod, ShippingAddress, UnknownOption};

/// Errors raised by the checkout wizard.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart is empty; callers should send the shopper back to the cart view.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// The order has already been placed.
    #[error("order has already been placed")]
    AlreadyPlaced,

    /// Orders can only be placed from the review step.
    #[error("cannot place an order from the {0} step")]
    NotAtReview(CheckoutStep),

    /// Coupon rejected; the checkout is unchanged.
    #[error(transparent)]
    Coupon(#[from] CouponError),

    /// Pricing failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Checkout wizard step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckoutStep {
    /// Shipping address entry
    #[default]
    Address,

    /// Delivery slot choice
    Delivery,

    /// Payment method choice
    Payment,

    /// Final review and pricing
    Review,
}

impl CheckoutStep {
    /// Every step, in wizard order.
    pub const ALL: [CheckoutStep; 4] = [
        CheckoutStep::Address,
        CheckoutStep::Delivery,
        CheckoutStep::Payment,
        CheckoutStep::Review,
    ];

    /// The following step, or `None` at review.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            CheckoutStep::Address => Some(CheckoutStep::Delivery),
            CheckoutStep::Delivery => Some(CheckoutStep::Payment),
            CheckoutStep::Payment => Some(CheckoutStep::Review),
            CheckoutStep::Review => None,
        }
    }

    /// The preceding step, or `None` at address.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        match self {
            CheckoutStep::Address => None,
            CheckoutStep::Delivery => Some(CheckoutStep::Address),
            CheckoutStep::Payment => Some(CheckoutStep::Delivery),
            CheckoutStep::Review => Some(CheckoutStep::Payment),
        }
    }

    /// Zero-based position in the wizard.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            CheckoutStep::Address => 0,
            CheckoutStep::Delivery => 1,
            CheckoutStep::Payment => 2,
            CheckoutStep::Review => 3,
        }
    }

    /// Display label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CheckoutStep::Address => "Address",
            CheckoutStep::Delivery => "Delivery",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Review => "Review",
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where the wizard is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutPhase {
    /// Filling in a step
    InProgress(CheckoutStep),

    /// Order placed; no further transitions
    Placed,
}

/// Order reference shown to the shopper: `BS` followed by eight digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderId(String);

impl OrderId {
    /// Derive an order id from the last eight digits of the epoch millisecond time.
    #[must_use]
    pub fn at(timestamp: Timestamp) -> Self {
        let digits = timestamp.as_millisecond().rem_euclid(100_000_000);

        Self(format!("BS{digits:08}"))
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything known about a placed order.
#[derive(Debug, Clone)]
pub struct OrderConfirmation {
    /// Order reference
    pub order_id: OrderId,

    /// When the order was placed
    pub placed_at: Timestamp,

    /// Lines bought, as they were in the cart
    pub lines: Vec<CartLineItem>,

    /// Final pricing
    pub summary: OrderSummary,

    /// Delivery address
    pub address: ShippingAddress,

    /// Delivery slot
    pub slot: DeliverySlot,

    /// Payment method
    pub payment: PaymentMethod,
}

/// Checkout wizard state
#[derive(Debug, Clone)]
pub struct Checkout {
    phase: CheckoutPhase,
    address: ShippingAddress,
    slot: DeliverySlot,
    payment: PaymentMethod,
    coupon: Option<AppliedCoupon>,
    policy: PricingPolicy,
}

impl Checkout {
    /// Start a checkout for the cart with the default pricing policy.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines.
    pub fn begin(cart: &Cart) -> Result<Self, CheckoutError> {
        Self::with_policy(cart, PricingPolicy::default())
    }

    /// Start a checkout for the cart with a custom pricing policy.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines.
    pub fn with_policy(cart: &Cart, policy: PricingPolicy) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        debug!(lines = cart.len(), "checkout started");

        Ok(Self {
            phase: CheckoutPhase::InProgress(CheckoutStep::Address),
            address: ShippingAddress::default(),
            slot: DeliverySlot::default(),
            payment: PaymentMethod::default(),
            coupon: None,
            policy,
        })
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    /// Current step, or `None` once the order is placed.
    #[must_use]
    pub fn step(&self) -> Option<CheckoutStep> {
        match self.phase {
            CheckoutPhase::InProgress(step) => Some(step),
            CheckoutPhase::Placed => None,
        }
    }

    /// Whether the order has been placed.
    #[must_use]
    pub fn is_placed(&self) -> bool {
        self.phase == CheckoutPhase::Placed
    }

    /// Advance one step. Stays put at review.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AlreadyPlaced`] after the order is placed.
    pub fn next(&mut self) -> Result<CheckoutStep, CheckoutError> {
        let step = self.current()?;
        let step = step.next().unwrap_or(step);

        self.phase = CheckoutPhase::InProgress(step);

        debug!(%step, "checkout advanced");

        Ok(step)
    }

    /// Go back one step. Stays put at address.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AlreadyPlaced`] after the order is placed.
    pub fn back(&mut self) -> Result<CheckoutStep, CheckoutError> {
        let step = self.current()?;
        let step = step.previous().unwrap_or(step);

        self.phase = CheckoutPhase::InProgress(step);

        debug!(%step, "checkout went back");

        Ok(step)
    }

    /// Shipping address entered so far.
    #[must_use]
    pub fn address(&self) -> &ShippingAddress {
        &self.address
    }

    /// Replace the shipping address.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AlreadyPlaced`] after the order is placed.
    pub fn set_address(&mut self, address: ShippingAddress) -> Result<(), CheckoutError> {
        self.current()?;
        self.address = address;

        Ok(())
    }

    /// Chosen delivery slot.
    #[must_use]
    pub fn slot(&self) -> DeliverySlot {
        self.slot
    }

    /// Choose a delivery slot.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AlreadyPlaced`] after the order is placed.
    pub fn set_slot(&mut self, slot: DeliverySlot) -> Result<(), CheckoutError> {
        self.current()?;
        self.slot = slot;

        Ok(())
    }

    /// Chosen payment method.
    #[must_use]
    pub fn payment(&self) -> PaymentMethod {
        self.payment
    }

    /// Choose a payment method.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AlreadyPlaced`] after the order is placed.
    pub fn set_payment(&mut self, payment: PaymentMethod) -> Result<(), CheckoutError> {
        self.current()?;
        self.payment = payment;

        Ok(())
    }

    /// Applied coupon, if any.
    #[must_use]
    pub fn coupon(&self) -> Option<AppliedCoupon> {
        self.coupon
    }

    /// Apply a coupon code. An unrecognised code leaves any earlier coupon in place.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Coupon`] for an unrecognised code, or
    /// [`CheckoutError::AlreadyPlaced`] after the order is placed.
    pub fn apply_coupon(&mut self, code: &str) -> Result<AppliedCoupon, CheckoutError> {
        self.current()?;

        let coupon = self.policy.redeem(code)?;
        self.coupon = Some(coupon);

        debug!(%coupon, "coupon applied");

        Ok(coupon)
    }

    /// Remove the applied coupon.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AlreadyPlaced`] after the order is placed.
    pub fn remove_coupon(&mut self) -> Result<(), CheckoutError> {
        self.current()?;
        self.coupon = None;

        Ok(())
    }

    /// Price the cart with the current coupon and delivery slot.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if an amount cannot be represented.
    pub fn summary(&self, cart: &Cart) -> Result<OrderSummary, PricingError> {
        OrderSummary::compute(cart.total(), self.coupon, self.slot, &self.policy)
    }

    /// Place the order now.
    ///
    /// # Errors
    ///
    /// See [`Checkout::place_order_at`].
    pub fn place_order(&mut self, cart: &mut Cart) -> Result<OrderConfirmation, CheckoutError> {
        self.place_order_at(cart, Timestamp::now())
    }

    /// Place the order at `placed_at`: price it, clear the cart and finish the wizard.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotAtReview`] before the review step,
    /// [`CheckoutError::AlreadyPlaced`] for a second placement and
    /// [`CheckoutError::EmptyCart`] if the cart was emptied meanwhile. The checkout and
    /// cart are unchanged on error.
    pub fn place_order_at(
        &mut self,
        cart: &mut Cart,
        placed_at: Timestamp,
    ) -> Result<OrderConfirmation, CheckoutError> {
        let step = self.current()?;

        if step != CheckoutStep::Review {
            return Err(CheckoutError::NotAtReview(step));
        }

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let summary = self.summary(cart)?;
        let lines = cart.lines().to_vec();

        cart.clear();
        self.phase = CheckoutPhase::Placed;

        let confirmation = OrderConfirmation {
            order_id: OrderId::at(placed_at),
            placed_at,
            lines,
            summary,
            address: self.address.clone(),
            slot: self.slot,
            payment: self.payment,
        };

        info!(
            order_id = %confirmation.order_id,
            total = %confirmation.summary.total(),
            payment = confirmation.payment.as_str(),
            "order placed"
        );

        Ok(confirmation)
    }

    fn current(&self) -> Result<CheckoutStep, CheckoutError> {
        self.step().ok_or(CheckoutError::AlreadyPlaced)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::{Money, iso};
    use testresult::TestResult;

    use super::*;
    use crate::storage::DocumentStore;

    fn cart_with(price: i64) -> Cart {
        let mut cart = Cart::load(DocumentStore::in_memory());
        cart.add(CartLineItem::new("1", "250g", 1, Decimal::from(price)));

        cart
    }

    fn at_review(cart: &Cart) -> Result<Checkout, CheckoutError> {
        let mut checkout = Checkout::begin(cart)?;

        for _ in 0..3 {
            checkout.next()?;
        }

        Ok(checkout)
    }

    #[test]
    fn begin_rejects_empty_cart() {
        let cart = Cart::load(DocumentStore::in_memory());

        assert!(matches!(
            Checkout::begin(&cart),
            Err(CheckoutError::EmptyCart)
        ));
    }

    #[test]
    fn steps_advance_and_clamp() -> TestResult {
        let cart = cart_with(500);
        let mut checkout = Checkout::begin(&cart)?;

        assert_eq!(checkout.back()?, CheckoutStep::Address);
        assert_eq!(checkout.next()?, CheckoutStep::Delivery);
        assert_eq!(checkout.next()?, CheckoutStep::Payment);
        assert_eq!(checkout.next()?, CheckoutStep::Review);
        assert_eq!(checkout.next()?, CheckoutStep::Review);
        assert_eq!(checkout.back()?, CheckoutStep::Payment);

        Ok(())
    }

    #[test]
    fn step_table_is_linear() {
        for pair in CheckoutStep::ALL.windows(2) {
            if let [from, to] = pair {
                assert_eq!(from.next(), Some(*to));
                assert_eq!(to.previous(), Some(*from));
                assert_eq!(from.index() + 1, to.index());
            }
        }
    }

    #[test]
    fn place_order_requires_review() -> TestResult {
        let mut cart = cart_with(500);
        let mut checkout = Checkout::begin(&cart)?;
        checkout.next()?;

        let result = checkout.place_order(&mut cart);

        assert!(matches!(
            result,
            Err(CheckoutError::NotAtReview(CheckoutStep::Delivery))
        ));
        assert!(!cart.is_empty());

        Ok(())
    }

    #[test]
    fn place_order_clears_cart_and_is_terminal() -> TestResult {
        let mut cart = cart_with(1000);
        let mut checkout = at_review(&cart)?;
        checkout.apply_coupon("sweet10")?;

        let confirmation = checkout.place_order(&mut cart)?;

        assert!(cart.is_empty());
        assert!(checkout.is_placed());
        assert_eq!(confirmation.lines.len(), 1);
        assert_eq!(confirmation.summary.total(), Money::from_minor(900_00, iso::INR));
        assert!(matches!(checkout.next(), Err(CheckoutError::AlreadyPlaced)));
        assert!(matches!(checkout.back(), Err(CheckoutError::AlreadyPlaced)));
        assert!(matches!(
            checkout.set_slot(DeliverySlot::Express),
            Err(CheckoutError::AlreadyPlaced)
        ));
        assert!(matches!(
            checkout.place_order(&mut cart),
            Err(CheckoutError::AlreadyPlaced)
        ));

        Ok(())
    }

    #[test]
    fn place_order_refuses_emptied_cart() -> TestResult {
        let mut cart = cart_with(500);
        let mut checkout = at_review(&cart)?;
        cart.clear();

        assert!(matches!(
            checkout.place_order(&mut cart),
            Err(CheckoutError::EmptyCart)
        ));
        assert_eq!(checkout.step(), Some(CheckoutStep::Review));

        Ok(())
    }

    #[test]
    fn unpriceable_cart_fails_without_placing() -> TestResult {
        let mut cart = Cart::load(DocumentStore::in_memory());
        cart.add(CartLineItem::new("1", "250g", 3, Decimal::MAX));
        let mut checkout = at_review(&cart)?;

        assert!(matches!(
            checkout.summary(&cart),
            Err(PricingError::PercentConversion)
        ));
        assert!(matches!(
            checkout.place_order(&mut cart),
            Err(CheckoutError::Pricing(PricingError::PercentConversion))
        ));
        assert_eq!(checkout.step(), Some(CheckoutStep::Review));
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn rejected_coupon_keeps_previous_state() -> TestResult {
        let cart = cart_with(500);
        let mut checkout = Checkout::begin(&cart)?;

        assert!(matches!(
            checkout.apply_coupon("bogus"),
            Err(CheckoutError::Coupon(CouponError::Unrecognized(_)))
        ));
        assert_eq!(checkout.coupon(), None);
        assert_eq!(
            checkout.summary(&cart)?.total(),
            Money::from_minor(599_00, iso::INR)
        );

        Ok(())
    }

    #[test]
    fn express_slot_is_priced() -> TestResult {
        let cart = cart_with(500);
        let mut checkout = Checkout::begin(&cart)?;
        checkout.set_slot(DeliverySlot::Express)?;

        assert_eq!(
            checkout.summary(&cart)?.total(),
            Money::from_minor(698_00, iso::INR)
        );

        Ok(())
    }

    #[test]
    fn order_id_uses_last_eight_millisecond_digits() -> TestResult {
        let placed_at = Timestamp::from_millisecond(1_705_314_600_123)?;

        assert_eq!(OrderId::at(placed_at).as_str(), "BS14600123");

        Ok(())
    }

    #[test]
    fn order_id_pads_short_values() -> TestResult {
        let placed_at = Timestamp::from_millisecond(42)?;

        assert_eq!(OrderId::at(placed_at).to_string(), "BS00000042");

        Ok(())
    }

    #[test]
    fn confirmation_carries_form_state() -> TestResult {
        let mut cart = cart_with(500);
        let mut checkout = Checkout::begin(&cart)?;
        checkout.set_address(ShippingAddress {
            name: "Asha Rao".to_string(),
            ..ShippingAddress::default()
        })?;
        checkout.set_payment(PaymentMethod::Upi)?;

        for _ in 0..3 {
            checkout.next()?;
        }

        let confirmation = checkout.place_order(&mut cart)?;

        assert_eq!(confirmation.address.name, "Asha Rao");
        assert_eq!(confirmation.payment, PaymentMethod::Upi);
        assert_eq!(confirmation.slot, DeliverySlot::Standard);

        Ok(())
    }
}
