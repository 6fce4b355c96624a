//! # Checkout
//!
//! Settles a cart into the user's purchase history.
//!
//! ## Settlement Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Reject an empty cart                                                │
//! │  2. Build one PurchaseRecord per line (price = unit × qty)              │
//! │  3. Check the balance covers every free refill in the cart              │
//! │     ── nothing has been mutated up to here ──                           │
//! │  4. Deduct redeemed points, credit 20/refill unit and 10/original unit  │
//! │  5. Append the records, clear the first-time flag, clear the cart       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed settlement leaves both the user and the cart as they were.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::checkout_points;
use crate::types::{PurchaseRecord, User};

/// Outcome of a successful checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    /// Records appended to the history, in cart order.
    pub records: Vec<PurchaseRecord>,
    pub total_charged: Money,
    pub points_redeemed: u32,
    pub points_earned: u32,
    /// Balance after redemption and credit.
    pub reward_points: u32,
}

/// Settles `cart` against `user` at `now`.
///
/// ## Errors
/// - `EmptyCart` when there is nothing to buy
/// - `InsufficientPoints` when free refills need more points than the user has
/// - `ValidationError` for a line that cannot become a record
pub fn settle(user: &mut User, cart: &mut Cart, now: DateTime<Utc>) -> CoreResult<CheckoutReceipt> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let records = cart
        .lines
        .iter()
        .map(|line| {
            PurchaseRecord::new(
                line.product_id.clone(),
                line.name.clone(),
                line.purchase_type,
                line.quantity,
                line.unit_price,
                now,
            )
        })
        .collect::<CoreResult<Vec<_>>>()?;

    let points_redeemed = cart.points_to_redeem();
    if points_redeemed > user.reward_points {
        return Err(CoreError::InsufficientPoints {
            available: user.reward_points,
            required: points_redeemed,
        });
    }

    let points_earned = cart.lines.iter().fold(0u32, |acc, line| {
        let units = u32::try_from(line.quantity).unwrap_or(u32::MAX);
        acc.saturating_add(checkout_points(line.purchase_type).saturating_mul(units))
    });

    user.apply_point_delta(-i64::from(points_redeemed))?;
    let reward_points = user.apply_point_delta(i64::from(points_earned))?;

    for record in &records {
        user.append_purchase(record.clone());
    }
    user.mark_returning();

    let total_charged = cart.total();
    cart.clear();

    Ok(CheckoutReceipt {
        records,
        total_charged,
        points_redeemed,
        points_earned,
        reward_points,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLine;
    use crate::catalog::Catalog;
    use crate::eligibility::{OfferChoice, ProductOffer};
    use crate::types::PurchaseType;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_cart_rejected() {
        let mut user = User::new("u1", "ada@example.com", "Ada");
        let mut cart = Cart::new();

        assert!(matches!(
            settle(&mut user, &mut cart, now()),
            Err(CoreError::EmptyCart)
        ));
        assert!(user.is_first_time);
    }

    #[test]
    fn test_first_combo_checkout() {
        let catalog = Catalog::standard();
        let mut user = User::new("u1", "ada@example.com", "Ada");
        let mut cart = Cart::new();

        let offer = ProductOffer::evaluate(&user, catalog.get("1").unwrap(), 0).unwrap();
        cart.add(offer.choose(OfferChoice::AcceptCombo).unwrap()).unwrap();

        let receipt = settle(&mut user, &mut cart, now()).unwrap();

        assert_eq!(receipt.records.len(), 1);
        assert_eq!(receipt.total_charged.cents(), 3738);
        assert_eq!(receipt.points_earned, 10);
        assert_eq!(user.reward_points, 10);
        assert!(!user.is_first_time);
        assert!(cart.is_empty());

        let record = &user.purchase_history[0];
        assert_eq!(record.purchase_type, PurchaseType::Original);
        assert_eq!(record.price.cents(), 3738);
        assert_eq!(record.next_refill_date, Some(now() + Duration::days(30)));
    }

    #[test]
    fn test_credit_is_per_unit_and_type() {
        let catalog = Catalog::standard();
        let tide = catalog.get("1").unwrap();
        let mut user = User::new("u1", "ada@example.com", "Ada");
        let mut cart = Cart::new();

        cart.add(CartLine::original(tide).with_quantity(2)).unwrap();
        let refill = crate::pricing::refill_quote(tide, 0).unwrap();
        cart.add(CartLine::refill(tide, &refill).with_quantity(3))
            .unwrap();

        let receipt = settle(&mut user, &mut cart, now()).unwrap();

        assert_eq!(receipt.points_earned, 2 * 10 + 3 * 20);
        assert_eq!(user.reward_points, 80);
        assert_eq!(receipt.records[0].price.cents(), 2 * 2499);
        assert_eq!(receipt.records[1].price.cents(), 3 * 1899);
        assert_eq!(receipt.records[1].next_refill_date, None);
    }

    #[test]
    fn test_free_refill_redeems_then_credits() {
        let catalog = Catalog::standard();
        let tide = catalog.get("1").unwrap();
        let mut user = User::new("u1", "ada@example.com", "Ada");
        user.reward_points = 120;

        let mut cart = Cart::new();
        let quote = crate::pricing::refill_quote(tide, user.reward_points).unwrap();
        cart.add(CartLine::refill(tide, &quote)).unwrap();

        let receipt = settle(&mut user, &mut cart, now()).unwrap();

        assert_eq!(receipt.points_redeemed, 100);
        assert_eq!(receipt.points_earned, 20);
        assert_eq!(receipt.reward_points, 40);
        assert!(receipt.total_charged.is_zero());
        assert!(user.purchase_history[0].price.is_zero());
    }

    #[test]
    fn test_insufficient_points_leaves_state_untouched() {
        let catalog = Catalog::standard();
        let tide = catalog.get("1").unwrap();
        let mut user = User::new("u1", "ada@example.com", "Ada");
        user.reward_points = 150;

        let mut cart = Cart::new();
        let quote = crate::pricing::refill_quote(tide, 150).unwrap();
        cart.add(CartLine::refill(tide, &quote).with_quantity(2))
            .unwrap();
        let before = cart.clone();

        let err = settle(&mut user, &mut cart, now()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientPoints {
                available: 150,
                required: 200
            }
        ));
        assert_eq!(user.reward_points, 150);
        assert!(user.purchase_history.is_empty());
        assert!(user.is_first_time);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_first_time_cleared_even_without_originals() {
        let catalog = Catalog::standard();
        let tide = catalog.get("1").unwrap();
        let mut user = User::new("u1", "ada@example.com", "Ada");
        let mut cart = Cart::new();

        let quote = crate::pricing::refill_quote(tide, 0).unwrap();
        cart.add(CartLine::refill(tide, &quote)).unwrap();
        settle(&mut user, &mut cart, now()).unwrap();

        assert!(!user.is_first_time);
    }
}
