//! # Domain Types
//!
//! Core domain types used throughout RefillHub.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────┐      │
//! │  │    Product      │   │      User       │   │  PurchaseRecord  │      │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────  │      │
//! │  │  id             │   │  id             │   │  id (UUID)       │      │
//! │  │  price          │   │  reward_points  │◄──│  product_id      │      │
//! │  │  refill_price?  │   │  is_first_time  │   │  purchase_type   │      │
//! │  │  has_refill     │   │  history ───────┼──►│  price (frozen)  │      │
//! │  │  reward_points  │   └─────────────────┘   │  next_refill?    │      │
//! │  └─────────────────┘                         └──────────────────┘      │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │    Category     │   │  PurchaseType   │                             │
//! │  │  Cleaning ...   │   │  Original       │                             │
//! │  │  BabyCare       │   │  Refill         │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persisted Shape
//! `User` serializes to the camelCase JSON the storefront keeps in its local
//! key-value store; `PurchaseRecord.price` is a decimal number there.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::{self, Money};
use crate::validation::{validate_price_cents, validate_quantity};
use crate::{FREE_REFILL_POINTS, REFILL_INTERVAL_DAYS};

// =============================================================================
// Category
// =============================================================================

/// Catalog category. Serialized as the kebab-case id the storefront uses in URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Cleaning,
    PersonalCare,
    Kitchen,
    Beverages,
    HomeCare,
    BabyCare,
}

impl Category {
    /// Every category, in catalog display order.
    pub const ALL: [Category; 6] = [
        Category::Cleaning,
        Category::PersonalCare,
        Category::Kitchen,
        Category::Beverages,
        Category::HomeCare,
        Category::BabyCare,
    ];

    /// The URL id, e.g. `personal-care`.
    pub const fn id(&self) -> &'static str {
        match self {
            Category::Cleaning => "cleaning",
            Category::PersonalCare => "personal-care",
            Category::Kitchen => "kitchen",
            Category::Beverages => "beverages",
            Category::HomeCare => "home-care",
            Category::BabyCare => "baby-care",
        }
    }

    /// Human-readable name shown in category filters.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Category::Cleaning => "Cleaning Supplies",
            Category::PersonalCare => "Personal Care",
            Category::Kitchen => "Kitchen Essentials",
            Category::Beverages => "Beverages",
            Category::HomeCare => "Home Care",
            Category::BabyCare => "Baby Care",
        }
    }

    /// Parses a URL id. Returns `None` for unknown ids (including `all`).
    pub fn from_id(id: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.id() == id)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog entry. Immutable once the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique catalog id.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Brand line, when the catalog has one.
    pub brand: Option<String>,

    /// Price of the original (container + contents).
    pub price: Money,

    /// Price of a refill pack. Expected to be below `price`.
    pub refill_price: Option<Money>,

    pub category: Category,

    /// Points advertised for buying this product.
    pub reward_points: u32,

    /// Whether refills are sold for this product.
    pub has_refill: bool,
}

impl Product {
    /// Checks the product's prices are usable by the pricing engine.
    pub fn validate(&self) -> CoreResult<()> {
        validate_price_cents("price", self.price.cents())?;
        if let Some(refill) = self.refill_price {
            validate_price_cents("refill price", refill.cents())?;
        }
        Ok(())
    }

    /// Returns the refill price, or `IneligibleRefill` when the product has
    /// no refill option.
    pub fn refill_price(&self) -> CoreResult<Money> {
        match (self.has_refill, self.refill_price) {
            (true, Some(price)) => Ok(price),
            _ => Err(CoreError::IneligibleRefill {
                product_id: self.id.clone(),
            }),
        }
    }

    /// True when a refill can actually be offered.
    #[inline]
    pub fn is_refillable(&self) -> bool {
        self.has_refill && self.refill_price.is_some()
    }
}

// =============================================================================
// Purchase Type
// =============================================================================

/// What was bought: the durable original or a refill of its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseType {
    Original,
    Refill,
}

impl fmt::Display for PurchaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurchaseType::Original => f.write_str("original"),
            PurchaseType::Refill => f.write_str("refill"),
        }
    }
}

// =============================================================================
// Purchase Record
// =============================================================================

/// One completed purchase in a user's history.
///
/// Uses the snapshot pattern: name and price are frozen at checkout and never
/// recomputed, even if the catalog changes later. Records are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    pub id: String,
    pub product_id: String,
    /// Product name at time of purchase (frozen).
    pub product_name: String,
    #[serde(rename = "type")]
    pub purchase_type: PurchaseType,
    pub quantity: i64,
    /// Total paid for the line: unit price charged × quantity.
    #[serde(with = "money::serde_decimal")]
    #[ts(type = "number")]
    pub price: Money,
    #[ts(as = "String")]
    pub purchase_date: DateTime<Utc>,
    /// Set only for originals: purchase date + 30 days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub next_refill_date: Option<DateTime<Utc>>,
}

impl PurchaseRecord {
    /// Creates a record for `quantity` units charged at `unit_price` each.
    ///
    /// ## Errors
    /// - `ValidationError` when quantity < 1 or the unit price is negative
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        purchase_type: PurchaseType,
        quantity: i64,
        unit_price: Money,
        purchased_at: DateTime<Utc>,
    ) -> CoreResult<Self> {
        validate_quantity(quantity)?;
        validate_price_cents("unit price", unit_price.cents())?;

        let next_refill_date = match purchase_type {
            PurchaseType::Original => Some(purchased_at + Duration::days(REFILL_INTERVAL_DAYS)),
            PurchaseType::Refill => None,
        };

        Ok(PurchaseRecord {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.into(),
            product_name: product_name.into(),
            purchase_type,
            quantity,
            price: unit_price.multiply_quantity(quantity),
            purchase_date: purchased_at,
            next_refill_date,
        })
    }
}

// =============================================================================
// User
// =============================================================================

/// A storefront customer.
///
/// ## Mutation Rules
/// - `reward_points` changes only through [`User::apply_point_delta`]
/// - `purchase_history` grows only through [`User::append_purchase`]
/// - `is_first_time` is cleared only by checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub reward_points: u32,
    pub is_first_time: bool,
    #[serde(default)]
    pub purchase_history: Vec<PurchaseRecord>,
}

impl User {
    /// Creates a brand-new account: zero points, first-time buyer, no history.
    pub fn new(id: impl Into<String>, email: impl Into<String>, name: impl Into<String>) -> Self {
        User {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            reward_points: 0,
            is_first_time: true,
            purchase_history: Vec::new(),
        }
    }

    /// Whether this user has ever bought `product_id` as an original.
    ///
    /// Linear scan; histories are small.
    pub fn has_purchased_original(&self, product_id: &str) -> bool {
        self.purchase_history
            .iter()
            .any(|p| p.purchase_type == PurchaseType::Original && p.product_id == product_id)
    }

    /// Adds `delta` points (negative to redeem) and returns the new balance.
    ///
    /// ## Errors
    /// - `InsufficientPoints` if the balance would drop below zero; the
    ///   balance is left unchanged
    ///
    /// Credits past `u32::MAX` clamp to `u32::MAX`.
    pub fn apply_point_delta(&mut self, delta: i64) -> CoreResult<u32> {
        let next = i64::from(self.reward_points).saturating_add(delta);
        if next < 0 {
            return Err(CoreError::InsufficientPoints {
                available: self.reward_points,
                required: delta.unsigned_abs().min(u64::from(u32::MAX)) as u32,
            });
        }
        self.reward_points = u32::try_from(next).unwrap_or(u32::MAX);
        Ok(self.reward_points)
    }

    /// Appends a completed purchase to the history.
    pub fn append_purchase(&mut self, record: PurchaseRecord) {
        self.purchase_history.push(record);
    }

    /// Clears the first-time-buyer flag.
    pub(crate) fn mark_returning(&mut self) {
        self.is_first_time = false;
    }

    /// Whether the balance covers a free refill.
    #[inline]
    pub fn can_redeem_free_refill(&self) -> bool {
        self.reward_points >= FREE_REFILL_POINTS
    }

    /// Points still needed for a free refill (0 when already eligible).
    pub fn points_until_free_refill(&self) -> u32 {
        FREE_REFILL_POINTS.saturating_sub(self.reward_points)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn refillable() -> Product {
        Product {
            id: "1".to_string(),
            name: "Tide Laundry Detergent".to_string(),
            brand: None,
            price: Money::from_cents(2499),
            refill_price: Some(Money::from_cents(1899)),
            category: Category::Cleaning,
            reward_points: 25,
            has_refill: true,
        }
    }

    #[test]
    fn test_category_ids_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_id(category.id()), Some(category));
        }
        assert_eq!(Category::from_id("all"), None);
        assert_eq!(
            serde_json::to_string(&Category::PersonalCare).unwrap(),
            "\"personal-care\""
        );
    }

    #[test]
    fn test_refill_price_requires_flag_and_price() {
        let product = refillable();
        assert_eq!(product.refill_price().unwrap().cents(), 1899);

        let mut no_flag = refillable();
        no_flag.has_refill = false;
        assert!(matches!(
            no_flag.refill_price(),
            Err(CoreError::IneligibleRefill { .. })
        ));

        let mut no_price = refillable();
        no_price.refill_price = None;
        assert!(!no_price.is_refillable());
        assert!(no_price.refill_price().is_err());
    }

    #[test]
    fn test_product_validate_rejects_negative_prices() {
        let mut product = refillable();
        product.refill_price = Some(Money::from_cents(-1));
        assert!(matches!(product.validate(), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_purchase_record_original_sets_refill_date() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let record = PurchaseRecord::new(
            "1",
            "Tide",
            PurchaseType::Original,
            2,
            Money::from_cents(2499),
            at,
        )
        .unwrap();

        assert_eq!(record.price.cents(), 4998);
        assert_eq!(record.next_refill_date, Some(at + Duration::days(30)));
    }

    #[test]
    fn test_purchase_record_refill_has_no_refill_date() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let record =
            PurchaseRecord::new("1", "Tide", PurchaseType::Refill, 1, Money::zero(), at).unwrap();
        assert_eq!(record.next_refill_date, None);
        assert!(record.price.is_zero());
    }

    #[test]
    fn test_purchase_record_rejects_zero_quantity() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let err = PurchaseRecord::new("1", "Tide", PurchaseType::Refill, 0, Money::zero(), at);
        assert!(matches!(err, Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_purchase_record_json_shape() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let record = PurchaseRecord::new(
            "1",
            "Tide",
            PurchaseType::Original,
            1,
            Money::from_cents(3738),
            at,
        )
        .unwrap();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "original");
        assert_eq!(json["productId"], "1");
        assert_eq!(json["price"], 37.38);
        assert_eq!(json["purchaseDate"], "2024-03-01T12:00:00Z");
        assert_eq!(json["nextRefillDate"], "2024-03-31T12:00:00Z");
    }

    #[test]
    fn test_user_point_delta_never_below_zero() {
        let mut user = User::new("u1", "ada@example.com", "Ada");
        assert_eq!(user.apply_point_delta(120).unwrap(), 120);
        assert_eq!(user.apply_point_delta(-100).unwrap(), 20);

        let err = user.apply_point_delta(-21).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientPoints {
                available: 20,
                required: 21
            }
        ));
        assert_eq!(user.reward_points, 20);
    }

    #[test]
    fn test_user_point_delta_extremes() {
        let mut user = User::new("u1", "ada@example.com", "Ada");
        user.reward_points = 1;

        assert_eq!(user.apply_point_delta(i64::MAX).unwrap(), u32::MAX);
        assert_eq!(user.reward_points, u32::MAX);

        let err = user.apply_point_delta(i64::MIN).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientPoints { .. }));
        assert_eq!(user.reward_points, u32::MAX);
    }

    #[test]
    fn test_user_has_purchased_original() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut user = User::new("u1", "ada@example.com", "Ada");
        user.append_purchase(
            PurchaseRecord::new("2", "Shampoo", PurchaseType::Refill, 1, Money::zero(), at)
                .unwrap(),
        );
        assert!(!user.has_purchased_original("2"));

        user.append_purchase(
            PurchaseRecord::new("2", "Shampoo", PurchaseType::Original, 1, Money::zero(), at)
                .unwrap(),
        );
        assert!(user.has_purchased_original("2"));
        assert!(!user.has_purchased_original("1"));
    }

    #[test]
    fn test_free_refill_threshold() {
        let mut user = User::new("u1", "ada@example.com", "Ada");
        user.apply_point_delta(99).unwrap();
        assert!(!user.can_redeem_free_refill());
        assert_eq!(user.points_until_free_refill(), 1);

        user.apply_point_delta(1).unwrap();
        assert!(user.can_redeem_free_refill());
        assert_eq!(user.points_until_free_refill(), 0);
    }

    #[test]
    fn test_user_deserializes_without_history() {
        let json = r#"{"id":"1","email":"a@b.co","name":"A","rewardPoints":5,"isFirstTime":true}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.purchase_history.is_empty());
        assert_eq!(user.reward_points, 5);
    }
}
