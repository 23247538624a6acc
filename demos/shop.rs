//! Shop Example
//!
//! Browse the catalog with the storefront filters and add the results to the cart.
//!
//! Use `-s` to search, `-c` to pick a category and `--sort` to order the results
//! Use `-a` to add the first N results to the cart
//! Use `--data-dir` to keep the cart between runs

use std::io;

use anyhow::Result;
use clap::Parser;
use rust_decimal::Decimal;

use confection::{
    cart::CartLineItem,
    catalog::{FilterState, PriceRange, SortKey},
    config::StorefrontConfig,
    observability::init_logging,
    render::{write_cart, write_catalog},
};

/// Arguments for the shop example
#[derive(Debug, Parser)]
#[command(about = "Browse the sweets catalog")]
struct ShopArgs {
    /// Storefront settings
    #[command(flatten)]
    config: StorefrontConfig,

    /// Free-text search over names, categories and tags
    #[arg(short, long)]
    search: Option<String>,

    /// Category identifier
    #[arg(short, long)]
    category: Option<String>,

    /// Sort order (popularity, price-low, price-high, rating, newest)
    #[arg(long, default_value_t = SortKey::Popularity)]
    sort: SortKey,

    /// Minimum price in rupees
    #[arg(long, default_value_t = Decimal::ZERO)]
    min_price: Decimal,

    /// Maximum price in rupees
    #[arg(long)]
    max_price: Option<Decimal>,

    /// Only sugar-free sweets
    #[arg(long)]
    sugar_free: bool,

    /// Only vegan sweets
    #[arg(long)]
    vegan: bool,

    /// Add this many of the results to the cart
    #[arg(short, long, default_value_t = 0)]
    add: usize,

    /// Empty the cart before adding
    #[arg(long)]
    fresh: bool,
}

/// Shop Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = ShopArgs::parse();

    init_logging(&args.config.logging)?;

    let catalog = args.config.open_catalog()?;
    let mut session = args.config.open_session();

    let filter = FilterState {
        text_query: args.search.clone().unwrap_or_default(),
        category: args.category.clone(),
        price_range: match args.max_price {
            Some(max) => PriceRange::new(args.min_price, max),
            None => PriceRange::at_least(args.min_price),
        },
        sugar_free_only: args.sugar_free,
        vegan_only: args.vegan,
        sort: args.sort,
    };

    if let Some(query) = &args.search {
        session.preferences_mut().submit_search(query);
    }

    let results = catalog.search(&filter);

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    write_catalog(&mut handle, results.iter().copied())?;

    println!("{} of {} products", results.len(), catalog.len());

    if args.fresh {
        session.cart_mut().clear();
    }

    for product in results.iter().take(args.add) {
        if let Some(line) = CartLineItem::for_product(product, None, 1) {
            session.cart_mut().add(line);
            session.preferences_mut().view_product(&product.id);
        }
    }

    if !session.cart().is_empty() {
        write_cart(&mut handle, &session.cart().view(&catalog))?;
    }

    Ok(())
}
