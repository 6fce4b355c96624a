//! # Storefront Commands
//!
//! Every operation the presentation layer can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── account.rs   ◄─── Signup, login, logout, session restore
//! ├── product.rs   ◄─── Catalog listing by category
//! ├── offer.rs     ◄─── Product selection, combo / refill / original choice
//! ├── cart.rs      ◄─── Cart manipulation
//! ├── checkout.rs  ◄─── Settlement and persistence
//! ├── rewards.rs   ◄─── Points summary, refill reminders
//! └── config.rs    ◄─── Configuration retrieval
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs the cart
//! fn get_cart(cart: &CartState) -> CartResponse
//!
//! // Needs the logged-in user and the cart
//! fn select_product(catalog: &Catalog, session: &SessionState, cart: &CartState, ...)
//!
//! // Needs everything that checkout touches
//! async fn checkout(db: &DbState, session: &SessionState, cart: &CartState)
//! ```
//!
//! `Storefront` (lib.rs) owns one of each and hands them out.

pub mod account;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod offer;
pub mod product;
pub mod rewards;
