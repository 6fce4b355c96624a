//! # Offer Commands
//!
//! Selecting a product shows the offer for the logged-in shopper; each
//! choice turns that offer into a cart line.
//!
//! ## Offer Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  select_product("1")                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  OfferState::determine(user, product)                                   │
//! │         │                                                               │
//! │         ├── NoOffer ─────────► add_original                             │
//! │         │                                                               │
//! │         ├── FirstTimeCombo ──► accept_combo   (15% off item + refill)   │
//! │         │                 └──► add_original                             │
//! │         │                                                               │
//! │         └── ReturningRefill ─► choose_refill  (free at 100 points)      │
//! │                           └──► add_original                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The offer is re-evaluated under the cart lock when a choice is made, so
//! points reserved by free refills already in the cart are never counted
//! twice.

use refillhub_core::{Catalog, CoreError, OfferChoice, ProductOffer};
use tracing::debug;

use super::cart::CartResponse;
use crate::error::ApiError;
use crate::state::{CartState, SessionState};

/// Shows the offer for a product.
///
/// ## Errors
/// - `AUTH_ERROR` when nobody is logged in
/// - `NOT_FOUND` for an unknown product
pub fn select_product(
    catalog: &Catalog,
    session: &SessionState,
    cart: &CartState,
    product_id: &str,
) -> Result<ProductOffer, ApiError> {
    debug!(product_id = %product_id, "select_product command");

    let user = session.require()?;
    let product = catalog.get(product_id)?;
    let reserved = cart.with_cart(|c| c.points_to_redeem());

    Ok(ProductOffer::evaluate(&user, product, reserved)?)
}

/// Adds the product at its catalog price. Valid in every offer state.
pub fn add_original(
    catalog: &Catalog,
    session: &SessionState,
    cart: &CartState,
    product_id: &str,
) -> Result<CartResponse, ApiError> {
    debug!(product_id = %product_id, "add_original command");
    add_choice(catalog, session, cart, product_id, OfferChoice::Original)
}

/// Accepts the first-time combo deal.
///
/// ## Errors
/// `VALIDATION_ERROR` unless the offer is `FirstTimeCombo`
pub fn accept_combo(
    catalog: &Catalog,
    session: &SessionState,
    cart: &CartState,
    product_id: &str,
) -> Result<CartResponse, ApiError> {
    debug!(product_id = %product_id, "accept_combo command");
    add_choice(catalog, session, cart, product_id, OfferChoice::AcceptCombo)
}

/// Adds a refill, free when the unreserved balance covers it.
///
/// ## Errors
/// `VALIDATION_ERROR` unless the offer is `ReturningRefill`
pub fn choose_refill(
    catalog: &Catalog,
    session: &SessionState,
    cart: &CartState,
    product_id: &str,
) -> Result<CartResponse, ApiError> {
    debug!(product_id = %product_id, "choose_refill command");
    add_choice(catalog, session, cart, product_id, OfferChoice::Refill)
}

fn add_choice(
    catalog: &Catalog,
    session: &SessionState,
    cart: &CartState,
    product_id: &str,
    choice: OfferChoice,
) -> Result<CartResponse, ApiError> {
    let user = session.require()?;
    let product = catalog.get(product_id)?;

    let result = cart.with_cart_mut(|c| {
        let offer = ProductOffer::evaluate(&user, product, c.points_to_redeem())?;
        c.add(offer.choose(choice)?)?;
        Ok::<CartResponse, CoreError>(CartResponse::from(&*c))
    });

    result.map_err(ApiError::from)
}
