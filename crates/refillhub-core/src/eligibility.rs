//! # Eligibility
//!
//! Decides which offer a user sees when they select a product.
//!
//! ## Offer State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       select_product(user, product)                     │
//! │                                  │                                      │
//! │                  product refillable?                                    │
//! │                  ├── no ──► NoOffer ──────────► Original                │
//! │                  │                                                      │
//! │                  └── yes                                                │
//! │                       │                                                 │
//! │     first-time OR never bought this original?                           │
//! │       ├── yes ──► FirstTimeCombo ──┬──► AcceptCombo (combo price)       │
//! │       │                            └──► Original    (declined)          │
//! │       │                                                                 │
//! │       └── no ───► ReturningRefill ─┬──► Refill      (points rule)       │
//! │                                    └──► Original                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every choice produces a [`CartLine`]; nothing is booked until checkout.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::cart::CartLine;
use crate::error::{CoreError, CoreResult};
use crate::pricing::{
    combo_quote, original_quote, refill_quote, ComboQuote, OriginalQuote, RefillQuote,
};
use crate::types::{Product, User};

/// Which offer applies to a (user, product) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum OfferState {
    /// Product has no refill option.
    NoOffer,
    /// New to this product: original + first refill at a discount.
    FirstTimeCombo,
    /// Already owns the original: refill at refill price or free with points.
    ReturningRefill,
}

impl OfferState {
    /// Determines the state for `user` selecting `product`.
    pub fn determine(user: &User, product: &Product) -> OfferState {
        if !product.is_refillable() {
            OfferState::NoOffer
        } else if user.is_first_time || !user.has_purchased_original(&product.id) {
            OfferState::FirstTimeCombo
        } else {
            OfferState::ReturningRefill
        }
    }

    /// Whether `choice` is a legal action in this state.
    pub fn allows(&self, choice: OfferChoice) -> bool {
        matches!(
            (self, choice),
            (_, OfferChoice::Original)
                | (OfferState::FirstTimeCombo, OfferChoice::AcceptCombo)
                | (OfferState::ReturningRefill, OfferChoice::Refill)
        )
    }
}

impl fmt::Display for OfferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OfferState::NoOffer => f.write_str("no offer"),
            OfferState::FirstTimeCombo => f.write_str("first-time combo"),
            OfferState::ReturningRefill => f.write_str("returning refill"),
        }
    }
}

/// What the user picked in the offer dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum OfferChoice {
    Original,
    AcceptCombo,
    Refill,
}

impl fmt::Display for OfferChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OfferChoice::Original => f.write_str("original"),
            OfferChoice::AcceptCombo => f.write_str("combo"),
            OfferChoice::Refill => f.write_str("refill"),
        }
    }
}

/// The offer shown for a selected product, with every quote precomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductOffer {
    pub product: Product,
    pub state: OfferState,
    pub original: OriginalQuote,
    /// Present only in `FirstTimeCombo`.
    pub combo: Option<ComboQuote>,
    /// Present only in `ReturningRefill`.
    pub refill: Option<RefillQuote>,
}

impl ProductOffer {
    /// Evaluates the offer for `user` selecting `product`.
    ///
    /// `reserved_points` are points already earmarked by free refills in the
    /// cart; the redemption rule sees only what is left.
    ///
    /// ## Errors
    /// - `ValidationError` for negative catalog prices
    pub fn evaluate(user: &User, product: &Product, reserved_points: u32) -> CoreResult<Self> {
        let state = OfferState::determine(user, product);
        let original = original_quote(product)?;

        let (combo, refill) = match state {
            OfferState::NoOffer => (None, None),
            OfferState::FirstTimeCombo => (Some(combo_quote(product)?), None),
            OfferState::ReturningRefill => {
                let available = user.reward_points.saturating_sub(reserved_points);
                (None, Some(refill_quote(product, available)?))
            }
        };

        Ok(ProductOffer {
            product: product.clone(),
            state,
            original,
            combo,
            refill,
        })
    }

    /// Turns a choice into the cart line it adds.
    ///
    /// ## Errors
    /// - `InvalidOfferChoice` when the state does not allow `choice`
    pub fn choose(&self, choice: OfferChoice) -> CoreResult<CartLine> {
        let invalid = || CoreError::InvalidOfferChoice {
            state: self.state.to_string(),
            choice: choice.to_string(),
        };

        if !self.state.allows(choice) {
            return Err(invalid());
        }

        match choice {
            OfferChoice::Original => Ok(CartLine::original(&self.product)),
            OfferChoice::AcceptCombo => self
                .combo
                .as_ref()
                .map(|quote| CartLine::combo(&self.product, quote))
                .ok_or_else(invalid),
            OfferChoice::Refill => self
                .refill
                .as_ref()
                .map(|quote| CartLine::refill(&self.product, quote))
                .ok_or_else(invalid),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::money::Money;
    use crate::types::{PurchaseRecord, PurchaseType};
    use chrono::{TimeZone, Utc};

    fn returning_owner_of(product_id: &str, points: u32) -> User {
        let at = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        let mut user = User::new("u1", "ada@example.com", "Ada");
        user.append_purchase(
            PurchaseRecord::new(
                product_id,
                "Owned",
                PurchaseType::Original,
                1,
                Money::from_cents(100),
                at,
            )
            .unwrap(),
        );
        user.is_first_time = false;
        user.reward_points = points;
        user
    }

    #[test]
    fn test_non_refillable_is_no_offer() {
        let catalog = Catalog::standard();
        let user = User::new("u1", "ada@example.com", "Ada");
        let offer = ProductOffer::evaluate(&user, catalog.get("11").unwrap(), 0).unwrap();

        assert_eq!(offer.state, OfferState::NoOffer);
        assert!(offer.combo.is_none());
        assert!(offer.refill.is_none());

        let line = offer.choose(OfferChoice::Original).unwrap();
        assert_eq!(line.unit_price.cents(), 4599);
        assert!(matches!(
            offer.choose(OfferChoice::AcceptCombo),
            Err(CoreError::InvalidOfferChoice { .. })
        ));
        assert!(offer.choose(OfferChoice::Refill).is_err());
    }

    #[test]
    fn test_first_time_user_sees_combo() {
        let catalog = Catalog::standard();
        let user = User::new("u1", "ada@example.com", "Ada");
        let offer = ProductOffer::evaluate(&user, catalog.get("1").unwrap(), 0).unwrap();

        assert_eq!(offer.state, OfferState::FirstTimeCombo);
        assert_eq!(offer.combo.unwrap().total.cents(), 3738);

        let line = offer.choose(OfferChoice::AcceptCombo).unwrap();
        assert_eq!(line.id, "1-combo");
        assert_eq!(line.purchase_type, PurchaseType::Original);

        // Declining the combo buys the original alone
        let declined = offer.choose(OfferChoice::Original).unwrap();
        assert_eq!(declined.id, "1-original");
        assert_eq!(declined.unit_price.cents(), 2499);

        assert!(offer.choose(OfferChoice::Refill).is_err());
    }

    #[test]
    fn test_first_time_flag_wins_over_history() {
        let catalog = Catalog::standard();
        let mut user = returning_owner_of("1", 0);
        user.is_first_time = true;

        let state = OfferState::determine(&user, catalog.get("1").unwrap());
        assert_eq!(state, OfferState::FirstTimeCombo);
    }

    #[test]
    fn test_returning_user_new_product_sees_combo() {
        let catalog = Catalog::standard();
        let user = returning_owner_of("1", 0);

        let state = OfferState::determine(&user, catalog.get("2").unwrap());
        assert_eq!(state, OfferState::FirstTimeCombo);
    }

    #[test]
    fn test_refill_purchase_does_not_count_as_owning() {
        let catalog = Catalog::standard();
        let at = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        let mut user = returning_owner_of("1", 0);
        user.append_purchase(
            PurchaseRecord::new("2", "Shampoo", PurchaseType::Refill, 1, Money::zero(), at)
                .unwrap(),
        );

        let state = OfferState::determine(&user, catalog.get("2").unwrap());
        assert_eq!(state, OfferState::FirstTimeCombo);
    }

    #[test]
    fn test_returning_user_paid_refill() {
        let catalog = Catalog::standard();
        let user = returning_owner_of("1", 99);
        let offer = ProductOffer::evaluate(&user, catalog.get("1").unwrap(), 0).unwrap();

        assert_eq!(offer.state, OfferState::ReturningRefill);
        let line = offer.choose(OfferChoice::Refill).unwrap();
        assert_eq!(line.id, "1-refill");
        assert_eq!(line.unit_price.cents(), 1899);
        assert_eq!(line.points_redeemed, 0);

        assert!(matches!(
            offer.choose(OfferChoice::AcceptCombo),
            Err(CoreError::InvalidOfferChoice { .. })
        ));
    }

    #[test]
    fn test_returning_user_free_refill() {
        let catalog = Catalog::standard();
        let user = returning_owner_of("1", 100);
        let offer = ProductOffer::evaluate(&user, catalog.get("1").unwrap(), 0).unwrap();

        let line = offer.choose(OfferChoice::Refill).unwrap();
        assert!(line.unit_price.is_zero());
        assert_eq!(line.points_redeemed, 100);
        assert_eq!(line.id, "1-refill-free");
    }

    #[test]
    fn test_reserved_points_are_not_redeemed_twice() {
        let catalog = Catalog::standard();
        let user = returning_owner_of("1", 150);
        let offer = ProductOffer::evaluate(&user, catalog.get("1").unwrap(), 100).unwrap();

        let refill = offer.refill.unwrap();
        assert!(!refill.is_free());
        assert_eq!(refill.charged_price.cents(), 1899);
    }

    #[test]
    fn test_invalid_choice_message() {
        let catalog = Catalog::standard();
        let user = User::new("u1", "ada@example.com", "Ada");
        let offer = ProductOffer::evaluate(&user, catalog.get("12").unwrap(), 0).unwrap();

        let err = offer.choose(OfferChoice::Refill).unwrap_err();
        assert_eq!(
            err.to_string(),
            "refill is not available for this offer (no offer)"
        );
    }
}
