//! # refillhub-core: Pure Business Logic for RefillHub
//!
//! This crate is the **heart** of RefillHub. It contains the pricing,
//! reward and eligibility rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        RefillHub Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation Layer (browser)                    │   │
//! │  │   Catalog ──► Offer dialog ──► Cart ──► Checkout ──► Profile   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 Storefront commands (apps/storefront)           │   │
//! │  │    select_product, accept_combo, choose_refill, checkout ...   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ refillhub-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌───────────┐ ┌───────────┐ ┌──────┐ ┌──────────┐ │   │
//! │  │  │ pricing │ │eligibility│ │ reminders │ │ cart │ │ checkout │ │   │
//! │  │  └─────────┘ └───────────┘ └───────────┘ └──────┘ └──────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            refillhub-store (local key-value store)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, User, PurchaseRecord, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`catalog`] - The product catalog and category filter
//! - [`pricing`] - Combo, refill and reward point rules
//! - [`eligibility`] - Per-product offer state machine
//! - [`reminders`] - Refill-due and upcoming refill selection
//! - [`cart`] - Cart container and totals
//! - [`checkout`] - Settlement of a cart into purchase history
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output; "now" is always a parameter
//! 2. **Explicit State**: `User` and `Cart` are passed by reference and only
//!    mutated through their own methods
//! 3. **Integer Money**: All monetary values are in cents
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use refillhub_core::catalog::Catalog;
//! use refillhub_core::pricing::combo_quote;
//!
//! let catalog = Catalog::standard();
//! let tide = catalog.get("1").unwrap();
//!
//! let quote = combo_quote(tide).unwrap();
//! assert_eq!(quote.total.cents(), 3738); // $24.99 + $18.99 - 15%
//! assert_eq!(quote.reward_points, 2 * 25 + 50);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod eligibility;
pub mod error;
pub mod money;
pub mod pricing;
pub mod reminders;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine, CartTotals};
pub use catalog::Catalog;
pub use checkout::{settle, CheckoutReceipt};
pub use eligibility::{OfferChoice, OfferState, ProductOffer};
pub use error::{AuthError, CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{ComboQuote, OriginalQuote, RefillQuote};
pub use reminders::{RefillReminder, UpcomingRefill};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Combo discount in basis points (1500 = 15%).
pub const COMBO_DISCOUNT_BPS: u32 = 1500;

/// Bonus points on top of double points for a combo.
pub const COMBO_BONUS_POINTS: u32 = 50;

/// Points consumed by one free refill, and the balance needed to get one.
pub const FREE_REFILL_POINTS: u32 = 100;

/// Points credited at checkout per refill unit.
pub const REFILL_CHECKOUT_POINTS: u32 = 20;

/// Points credited at checkout per original unit.
pub const ORIGINAL_CHECKOUT_POINTS: u32 = 10;

/// Days after an original purchase when its refill falls due.
pub const REFILL_INTERVAL_DAYS: i64 = 30;

/// How many refill-due reminders are surfaced at once.
pub const MAX_REFILL_REMINDERS: usize = 3;

/// Look-ahead window for "refill coming up" notifications.
pub const UPCOMING_REFILL_WINDOW_DAYS: i64 = 7;

/// Maximum lines allowed in a single cart.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity on a single cart line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_LINE_QUANTITY: i64 = 999;
