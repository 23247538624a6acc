//! Checkout Example
//!
//! Fill a cart with best sellers and walk it through the checkout wizard.
//!
//! Use `-n` to specify the number of best sellers to add to the cart
//! Use `--coupon` to apply a coupon code at review
//! Use `--slot` and `--payment` to choose delivery and payment

use std::{io, time::Instant};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};

use confection::{
    cart::CartLineItem,
    checkout::{DeliverySlot, PaymentMethod, ShippingAddress},
    config::StorefrontConfig,
    observability::init_logging,
    render::{write_cart, write_confirmation, write_order_summary},
};

/// Arguments for the checkout example
#[derive(Debug, Parser)]
#[command(about = "Simulate a storefront checkout")]
struct CheckoutArgs {
    /// Storefront settings
    #[command(flatten)]
    config: StorefrontConfig,

    /// Number of best sellers to add to the cart
    #[arg(short, default_value_t = 2)]
    n: usize,

    /// Coupon code to apply
    #[arg(long)]
    coupon: Option<String>,

    /// Delivery slot (standard, express)
    #[arg(long, default_value = "standard")]
    slot: DeliverySlot,

    /// Payment method (upi, card, cod)
    #[arg(long, default_value = "cod")]
    payment: PaymentMethod,
}

/// Checkout Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = CheckoutArgs::parse();

    init_logging(&args.config.logging)?;

    let catalog = args.config.open_catalog()?;
    let mut session = args.config.open_session();

    for product in catalog.best_sellers().into_iter().take(args.n) {
        if let Some(line) = CartLineItem::for_product(product, None, 1) {
            session.cart_mut().add(line);
        }
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    write_cart(&mut handle, &session.cart().view(&catalog))?;

    let start = Instant::now();

    let mut checkout = session.begin_checkout()?;

    checkout.set_address(ShippingAddress {
        name: "Asha Rao".to_string(),
        phone: "+91 98450 12345".to_string(),
        email: "asha@example.com".to_string(),
        street: "12 MG Road".to_string(),
        city: "Bengaluru".to_string(),
        state: "Karnataka".to_string(),
        pincode: "560001".to_string(),
    })?;
    checkout.next()?;

    checkout.set_slot(args.slot)?;
    checkout.next()?;

    checkout.set_payment(args.payment)?;
    checkout.next()?;

    if let Some(code) = &args.coupon
        && let Err(error) = checkout.apply_coupon(code)
    {
        println!("{error}");
    }

    write_order_summary(&mut handle, &checkout.summary(session.cart())?)?;

    let confirmation = checkout.place_order(session.cart_mut())?;

    write_confirmation(&mut handle, &confirmation)?;

    println!("Checkout: {}", start.elapsed().human(Truncate::Nano));

    Ok(())
}
