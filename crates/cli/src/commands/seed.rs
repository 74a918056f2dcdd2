//! Catalog seeding command.
//!
//! Inserts a handful of sample products so a fresh install has something to
//! put in a cart. Idempotence is intentionally not attempted: running seed
//! twice gives you two of everything, which is fine for dev databases.

use rust_decimal::Decimal;
use tracing::info;

use juniper_api::db::{self, ProductRepository};

const SAMPLE_PRODUCTS: &[(&str, &str, i32)] = &[
    ("Juniper Enamel Mug", "14.50", 0),
    ("Waxed Canvas Tote", "38.00", 10),
    ("Cedar Incense Bundle", "9.75", 0),
    ("Wool Camp Blanket", "89.00", 15),
    ("Brass Pour-Over Stand", "52.25", 0),
];

/// Insert the sample catalog.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;
    let products = ProductRepository::new(&pool);

    for (title, price, discount_percent) in SAMPLE_PRODUCTS {
        let price: Decimal = price.parse()?;
        let product = products.create(title, price, *discount_percent).await?;
        info!(id = %product.id, title, "seeded product");
    }

    info!("Seeded {} products", SAMPLE_PRODUCTS.len());
    Ok(())
}
