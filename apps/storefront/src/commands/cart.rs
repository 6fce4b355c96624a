//! # Cart Commands
//!
//! Reading and editing lines already in the cart. Lines are added through
//! the offer commands (offer.rs), which decide the line's price.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐                        │
//! │  │  Empty   │────►│ In Cart  │────►│ Settled  │                        │
//! │  │  Cart    │     │          │     │ lines out│                        │
//! │  └──────────┘     └──────────┘     └──────────┘                        │
//! │                        │                 ▲                              │
//! │                   add_original      checkout                           │
//! │                   accept_combo     (checkout.rs)                       │
//! │                   choose_refill                                         │
//! │                   update_cart_line                                      │
//! │                   remove_from_cart                                      │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart / logout ──────────► (back to empty)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use refillhub_core::{Cart, CartLine, CartTotals, CoreError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::CartState;

/// Cart response including lines and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
    /// No further line or unit can be added.
    pub cart_full: bool,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            lines: cart.lines.clone(),
            totals: CartTotals::from(cart),
            cart_full: !cart.has_room(),
        }
    }
}

/// Gets the current cart contents.
pub fn get_cart(cart: &CartState) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::from(c))
}

/// Sets the quantity of a cart line.
///
/// ## Behavior
/// - Quantity 0: removes the line
/// - Negative or above the per-line maximum: `VALIDATION_ERROR`
/// - Unknown line: `NOT_FOUND`
pub fn update_cart_line(
    cart: &CartState,
    line_id: &str,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(line_id = %line_id, quantity = %quantity, "update_cart_line command");

    let result = cart.with_cart_mut(|c| {
        c.update_quantity(line_id, quantity)?;
        Ok::<CartResponse, CoreError>(CartResponse::from(&*c))
    });

    result.map_err(ApiError::from)
}

/// Removes a line from the cart.
pub fn remove_from_cart(cart: &CartState, line_id: &str) -> Result<CartResponse, ApiError> {
    debug!(line_id = %line_id, "remove_from_cart command");

    let result = cart.with_cart_mut(|c| {
        c.remove(line_id)?;
        Ok::<CartResponse, CoreError>(CartResponse::from(&*c))
    });

    result.map_err(ApiError::from)
}

/// Clears all lines from the cart.
pub fn clear_cart(cart: &CartState) -> CartResponse {
    debug!("clear_cart command");

    cart.with_cart_mut(|c| {
        c.clear();
        CartResponse::from(&*c)
    })
}
