//! # RefillHub Storefront Entry Point
//!
//! Headless start-up check: opens the local store, restores the last
//! session and prints what the storefront would show.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration (`REFILLHUB_*` overrides)
//! 3. Connect to database & run migrations
//! 4. Restore the session recorded in the store
//! 5. Print store, shopper and reminder summary
//!
//! Run `seed` first for a demo account with purchase history.

use chrono::Utc;
use refillhub_storefront::commands::{account, rewards};
use refillhub_storefront::state::ConfigState;
use refillhub_storefront::{init_tracing, Storefront};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = ConfigState::from_env();
    info!(store = %config.store_name, "Starting RefillHub storefront");

    let storefront = Storefront::open(config).await?;
    let config = storefront.config();

    println!(
        "{} ({} products)",
        config.store_name,
        storefront.catalog().len()
    );

    match account::restore_session(storefront.db(), storefront.session()).await? {
        Some(user) => {
            let summary = rewards::rewards_summary(storefront.session())?;
            println!("Signed in as {} <{}>", user.name, user.email);
            println!("{}", serde_json::to_string_pretty(&summary)?);

            for reminder in rewards::refill_reminders(storefront.session(), Utc::now())? {
                println!(
                    "  Refill due: {} (bought {} days ago)",
                    reminder.product_name, reminder.days_since_purchase
                );
            }
        }
        None => println!("Nobody signed in"),
    }

    storefront.db().inner().close().await;
    Ok(())
}
