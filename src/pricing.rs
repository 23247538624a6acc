//! Pricing
//!
//! Order pricing for the storefront: delivery fees, the express surcharge and coupon
//! redemption, computed in paise so that every total is exact.

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money, MoneyError,
    iso::{self, Currency},
};
use thiserror::Error;

use crate::checkout::DeliverySlot;

/// Errors that can occur while pricing an order.
#[derive(Debug, Error)]
pub enum PricingError {
    /// A rupee amount or percentage could not be represented in minor units.
    #[error("amount could not be converted to minor units")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A coupon code was not recognised. The order is priced as if no code was entered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponError {
    /// No coupon with this code exists.
    #[error("coupon code {0:?} is not valid")]
    Unrecognized(String),
}

/// A redeemed coupon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedCoupon {
    code: &'static str,
    percent: Percentage,
}

impl AppliedCoupon {
    /// Canonical (upper-case) code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Fraction of the subtotal taken off.
    #[must_use]
    pub fn percent(&self) -> Percentage {
        self.percent
    }
}

impl fmt::Display for AppliedCoupon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

/// Storefront pricing constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingPolicy {
    /// Subtotal at or above which standard delivery is free
    pub free_delivery_threshold: Decimal,

    /// Standard delivery fee below the threshold
    pub delivery_fee: Decimal,

    /// Extra charge for express delivery, regardless of subtotal
    pub express_surcharge: Decimal,

    /// The single recognised coupon code
    pub coupon_code: &'static str,

    /// Fraction of the subtotal the coupon takes off
    pub coupon_percent: Percentage,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_delivery_threshold: Decimal::from(999),
            delivery_fee: Decimal::from(99),
            express_surcharge: Decimal::from(99),
            coupon_code: "SWEET10",
            coupon_percent: Percentage::from(0.10),
        }
    }
}

impl PricingPolicy {
    /// Redeem a coupon code, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::Unrecognized`] for any other code.
    pub fn redeem(&self, code: &str) -> Result<AppliedCoupon, CouponError> {
        if code.eq_ignore_ascii_case(self.coupon_code) {
            Ok(AppliedCoupon {
                code: self.coupon_code,
                percent: self.coupon_percent,
            })
        } else {
            Err(CouponError::Unrecognized(code.to_string()))
        }
    }

    /// Standard delivery fee for a subtotal.
    #[must_use]
    pub fn delivery_fee_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal >= self.free_delivery_threshold {
            Decimal::ZERO
        } else {
            self.delivery_fee
        }
    }

    /// How much more must be spent to qualify for free delivery, if anything.
    #[must_use]
    pub fn free_delivery_shortfall(&self, subtotal: Decimal) -> Option<Decimal> {
        (subtotal < self.free_delivery_threshold).then(|| self.free_delivery_threshold - subtotal)
    }
}

/// Priced order, in rupees.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    subtotal: Money<'static, Currency>,
    discount: Money<'static, Currency>,
    delivery_fee: Money<'static, Currency>,
    express_surcharge: Money<'static, Currency>,
    total: Money<'static, Currency>,
    coupon: Option<AppliedCoupon>,
}

impl OrderSummary {
    /// Price an order: `subtotal − discount + delivery fee + express surcharge`.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if an amount cannot be represented in paise.
    pub fn compute(
        subtotal: Decimal,
        coupon: Option<AppliedCoupon>,
        slot: DeliverySlot,
        policy: &PricingPolicy,
    ) -> Result<Self, PricingError> {
        let subtotal_minor = to_minor(subtotal)?;
        let delivery_minor = to_minor(policy.delivery_fee_for(subtotal))?;

        let discount_minor = match coupon {
            Some(coupon) => percent_of_minor(coupon.percent, subtotal_minor)?,
            None => 0,
        };

        let express_minor = match slot {
            DeliverySlot::Express => to_minor(policy.express_surcharge)?,
            DeliverySlot::Standard => 0,
        };

        let subtotal = Money::from_minor(subtotal_minor, iso::INR);
        let discount = Money::from_minor(discount_minor, iso::INR);
        let delivery_fee = Money::from_minor(delivery_minor, iso::INR);
        let express_surcharge = Money::from_minor(express_minor, iso::INR);

        let total = subtotal
            .sub(discount)?
            .add(delivery_fee)?
            .add(express_surcharge)?;

        Ok(Self {
            subtotal,
            discount,
            delivery_fee,
            express_surcharge,
            total,
            coupon,
        })
    }

    /// Sum of the cart lines
    #[must_use]
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// Coupon discount
    #[must_use]
    pub fn discount(&self) -> Money<'static, Currency> {
        self.discount
    }

    /// Standard delivery fee
    #[must_use]
    pub fn delivery_fee(&self) -> Money<'static, Currency> {
        self.delivery_fee
    }

    /// Express delivery surcharge
    #[must_use]
    pub fn express_surcharge(&self) -> Money<'static, Currency> {
        self.express_surcharge
    }

    /// Delivery fee and express surcharge combined
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the addition fails.
    pub fn shipping(&self) -> Result<Money<'static, Currency>, MoneyError> {
        self.delivery_fee.add(self.express_surcharge)
    }

    /// Amount payable
    #[must_use]
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// Applied coupon, if any
    #[must_use]
    pub fn coupon(&self) -> Option<AppliedCoupon> {
        self.coupon
    }
}

/// Convert a rupee amount to paise, rounding half away from zero.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] if the amount does not fit in an `i64`.
pub fn to_minor(amount: Decimal) -> Result<i64, PricingError> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|paise| paise.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|paise| paise.to_i64())
        .ok_or(PricingError::PercentConversion)
}

/// Calculate `percent` of a minor unit amount, rounding half away from zero.
fn percent_of_minor(percent: Percentage, minor: i64) -> Result<i64, PricingError> {
    let Some(applied) = (percent * Decimal::ONE).checked_mul(Decimal::from(minor)) else {
        return Err(PricingError::PercentConversion);
    };

    applied
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::PercentConversion)
}
