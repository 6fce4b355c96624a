//! # Pricing
//!
//! Combo, refill and original pricing plus the reward point rules.
//!
//! ## Two Kinds of Reward Points
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OFFER TIME (shown in the dialog)     CHECKOUT TIME (actually credited) │
//! │  ─────────────────────────────────    ───────────────────────────────── │
//! │  combo   → 2 × product points + 50    original line → 10 per unit       │
//! │  refill  → product points             refill line   → 20 per unit       │
//! │  original→ product points                                               │
//! │                                                                         │
//! │  The estimate and the credit are separate rules. A combo is booked as   │
//! │  an original line, so it is credited 10 per unit at checkout.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{Product, PurchaseType};
use crate::validation::validate_price_cents;
use crate::{
    COMBO_BONUS_POINTS, COMBO_DISCOUNT_BPS, FREE_REFILL_POINTS, ORIGINAL_CHECKOUT_POINTS,
    REFILL_CHECKOUT_POINTS,
};

// =============================================================================
// Combo
// =============================================================================

/// Price breakdown for an original + first refill bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ComboQuote {
    /// Original price + refill price.
    pub subtotal: Money,
    /// 15% of the subtotal, rounded to the cent.
    pub discount: Money,
    /// `subtotal - discount`; the unit price of the combo cart line.
    pub total: Money,
    /// Offer-time estimate: `2 × product points + 50`.
    pub reward_points: u32,
}

/// Computes the combo price for an original at `price` and a refill at `refill_price`.
///
/// ## Formula
/// ```text
/// subtotal = P + R
/// discount = round(subtotal × 0.15)
/// total    = subtotal - discount
/// ```
///
/// ## Errors
/// - `ValidationError` if either price is negative
///
/// ## Example
/// ```rust
/// use refillhub_core::money::Money;
/// use refillhub_core::pricing::combo_price;
///
/// let (subtotal, discount, total) =
///     combo_price(Money::from_cents(2499), Money::from_cents(1899)).unwrap();
/// assert_eq!(subtotal.cents(), 4398);
/// assert_eq!(discount.cents(), 660);
/// assert_eq!(total.cents(), 3738);
/// ```
pub fn combo_price(price: Money, refill_price: Money) -> CoreResult<(Money, Money, Money)> {
    validate_price_cents("price", price.cents())?;
    validate_price_cents("refill price", refill_price.cents())?;

    let subtotal = price + refill_price;
    let discount = subtotal.percentage_of(COMBO_DISCOUNT_BPS);
    Ok((subtotal, discount, subtotal - discount))
}

/// Offer-time reward estimate for a combo: double points plus a bonus.
#[inline]
pub fn combo_reward_points(base_points: u32) -> u32 {
    base_points
        .saturating_mul(2)
        .saturating_add(COMBO_BONUS_POINTS)
}

/// Full combo quote for a product.
///
/// ## Errors
/// - `IneligibleRefill` when the product has no refill option
/// - `ValidationError` for negative prices
pub fn combo_quote(product: &Product) -> CoreResult<ComboQuote> {
    let refill_price = product.refill_price()?;
    let (subtotal, discount, total) = combo_price(product.price, refill_price)?;

    Ok(ComboQuote {
        subtotal,
        discount,
        total,
        reward_points: combo_reward_points(product.reward_points),
    })
}

// =============================================================================
// Refill
// =============================================================================

/// Price breakdown for a refill, with the free-refill redemption applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RefillQuote {
    /// Catalog refill price.
    pub refill_price: Money,
    /// What the cart line charges: zero when redeemed with points.
    pub charged_price: Money,
    /// Points consumed by this refill (0 or 100).
    pub points_redeemed: u32,
    /// Shown as "You save": original price - refill price.
    ///
    /// Always measured against the catalog refill price, even when the
    /// refill is free.
    pub displayed_savings: Money,
    /// Offer-time estimate: the product's points.
    pub reward_points: u32,
}

impl RefillQuote {
    #[inline]
    pub fn is_free(&self) -> bool {
        self.points_redeemed > 0
    }
}

/// Applies the redemption rule to a balance and a refill price.
///
/// Returns `(charged_price, points_redeemed)`: `(0, 100)` when
/// `balance ≥ 100`, otherwise `(refill_price, 0)`.
///
/// ## Example
/// ```rust
/// use refillhub_core::money::Money;
/// use refillhub_core::pricing::redeem_refill;
///
/// let refill = Money::from_cents(1899);
/// assert_eq!(redeem_refill(99, refill), (refill, 0));
/// assert_eq!(redeem_refill(100, refill), (Money::zero(), 100));
/// ```
pub fn redeem_refill(balance: u32, refill_price: Money) -> (Money, u32) {
    if balance >= FREE_REFILL_POINTS {
        (Money::zero(), FREE_REFILL_POINTS)
    } else {
        (refill_price, 0)
    }
}

/// Quotes a refill of `product` for a user holding `balance` points.
///
/// ## Errors
/// - `IneligibleRefill` when the product has no refill option
/// - `ValidationError` for negative prices
pub fn refill_quote(product: &Product, balance: u32) -> CoreResult<RefillQuote> {
    let refill_price = product.refill_price()?;
    validate_price_cents("price", product.price.cents())?;
    validate_price_cents("refill price", refill_price.cents())?;

    let (charged_price, points_redeemed) = redeem_refill(balance, refill_price);

    Ok(RefillQuote {
        refill_price,
        charged_price,
        points_redeemed,
        displayed_savings: product.price - refill_price,
        reward_points: product.reward_points,
    })
}

// =============================================================================
// Original
// =============================================================================

/// Price of the original alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OriginalQuote {
    pub price: Money,
    /// Offer-time estimate: the product's points.
    pub reward_points: u32,
}

/// Quotes the original at catalog price.
pub fn original_quote(product: &Product) -> CoreResult<OriginalQuote> {
    validate_price_cents("price", product.price.cents())?;
    Ok(OriginalQuote {
        price: product.price,
        reward_points: product.reward_points,
    })
}

// =============================================================================
// Checkout Credit
// =============================================================================

/// Points credited at checkout for one unit of `purchase_type`.
#[inline]
pub const fn checkout_points(purchase_type: PurchaseType) -> u32 {
    match purchase_type {
        PurchaseType::Refill => REFILL_CHECKOUT_POINTS,
        PurchaseType::Original => ORIGINAL_CHECKOUT_POINTS,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::error::CoreError;

    #[test]
    fn test_combo_spec_example() {
        let catalog = Catalog::standard();
        let quote = combo_quote(catalog.get("1").unwrap()).unwrap();

        assert_eq!(quote.subtotal.cents(), 4398);
        assert_eq!(quote.discount.cents(), 660);
        assert_eq!(quote.total.cents(), 3738);
        assert_eq!(quote.total.to_string(), "$37.38");
        assert_eq!(quote.reward_points, 100);
    }

    #[test]
    fn test_combo_is_85_percent_of_subtotal_for_catalog() {
        for product in Catalog::standard().products() {
            let Some(refill) = product.refill_price else {
                continue;
            };
            let quote = combo_quote(product).unwrap();
            let subtotal = product.price + refill;

            // round(subtotal × 0.85) in integer cents
            let expected = (subtotal.cents() * 85 + 50) / 100;
            assert!(
                (quote.total.cents() - expected).abs() <= 1,
                "{}: {} vs {}",
                product.name,
                quote.total.cents(),
                expected
            );
            assert!(quote.total < subtotal);
            assert_eq!(quote.reward_points, 2 * product.reward_points + 50);
        }
    }

    #[test]
    fn test_combo_price_is_total_at_zero() {
        let (subtotal, discount, total) = combo_price(Money::zero(), Money::zero()).unwrap();
        assert!(subtotal.is_zero());
        assert!(discount.is_zero());
        assert!(total.is_zero());
    }

    #[test]
    fn test_combo_price_rejects_negative() {
        let err = combo_price(Money::from_cents(100), Money::from_cents(-1)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_combo_rejects_non_refillable() {
        let catalog = Catalog::standard();
        let err = combo_quote(catalog.get("11").unwrap()).unwrap_err();
        assert!(matches!(err, CoreError::IneligibleRefill { product_id } if product_id == "11"));
    }

    #[test]
    fn test_free_refill_boundary() {
        let catalog = Catalog::standard();
        let tide = catalog.get("1").unwrap();

        let at_99 = refill_quote(tide, 99).unwrap();
        assert_eq!(at_99.charged_price.cents(), 1899);
        assert_eq!(at_99.points_redeemed, 0);
        assert!(!at_99.is_free());

        let at_100 = refill_quote(tide, 100).unwrap();
        assert!(at_100.charged_price.is_zero());
        assert_eq!(at_100.points_redeemed, 100);
        assert!(at_100.is_free());
    }

    #[test]
    fn test_refill_savings_ignore_redemption() {
        let catalog = Catalog::standard();
        let tide = catalog.get("1").unwrap();

        let paid = refill_quote(tide, 0).unwrap();
        let free = refill_quote(tide, 500).unwrap();

        assert_eq!(paid.displayed_savings.cents(), 600);
        assert_eq!(free.displayed_savings, paid.displayed_savings);
        assert_eq!(free.reward_points, 25);
    }

    #[test]
    fn test_refill_rejects_non_refillable() {
        let catalog = Catalog::standard();
        assert!(matches!(
            refill_quote(catalog.get("13").unwrap(), 200),
            Err(CoreError::IneligibleRefill { .. })
        ));
    }

    #[test]
    fn test_original_quote() {
        let catalog = Catalog::standard();
        let quote = original_quote(catalog.get("12").unwrap()).unwrap();
        assert_eq!(quote.price.cents(), 8999);
        assert_eq!(quote.reward_points, 15);
    }

    #[test]
    fn test_checkout_points() {
        assert_eq!(checkout_points(PurchaseType::Refill), 20);
        assert_eq!(checkout_points(PurchaseType::Original), 10);
    }
}
