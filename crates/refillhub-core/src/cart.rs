//! # Cart
//!
//! The shopping cart and its lines.
//!
//! ## Line Identity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Offer choice             Line id            Type      Unit price       │
//! │  ────────────             ───────            ────      ──────────       │
//! │  add original             {pid}-original     original  catalog price    │
//! │  accept combo             {pid}-combo        original  combo total      │
//! │  choose refill            {pid}-refill       refill    refill price     │
//! │  choose refill (points)   {pid}-refill-free  refill    0, 100 pts/unit  │
//! │                                                                         │
//! │  Adding a line whose id is already in the cart merges the quantities.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices are frozen on the line when it is added; checkout books exactly
//! what the line says.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{ComboQuote, RefillQuote};
use crate::types::{Product, PurchaseType};
use crate::validation::{validate_id, validate_price_cents, validate_quantity};
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// `{productId}-{variant}`; unique within a cart.
    pub id: String,

    pub product_id: String,

    /// Display name, e.g. "Tide Laundry Detergent (Combo Deal)".
    pub name: String,

    pub purchase_type: PurchaseType,

    /// Price charged per unit (frozen when added).
    pub unit_price: Money,

    /// Undiscounted price per unit, shown struck through.
    pub original_price: Option<Money>,

    pub quantity: i64,

    /// Points consumed per unit at checkout (free refills only).
    #[serde(default)]
    pub points_redeemed: u32,
}

impl CartLine {
    /// The product's original at catalog price.
    pub fn original(product: &Product) -> Self {
        CartLine {
            id: format!("{}-original", product.id),
            product_id: product.id.clone(),
            name: product.name.clone(),
            purchase_type: PurchaseType::Original,
            unit_price: product.price,
            original_price: None,
            quantity: 1,
            points_redeemed: 0,
        }
    }

    /// The product plus its first refill at the combo price.
    ///
    /// Booked as an original; the undiscounted subtotal is kept for display.
    pub fn combo(product: &Product, quote: &ComboQuote) -> Self {
        CartLine {
            id: format!("{}-combo", product.id),
            product_id: product.id.clone(),
            name: format!("{} (Combo Deal)", product.name),
            purchase_type: PurchaseType::Original,
            unit_price: quote.total,
            original_price: Some(quote.subtotal),
            quantity: 1,
            points_redeemed: 0,
        }
    }

    /// A refill of the product, paid or redeemed with points per `quote`.
    pub fn refill(product: &Product, quote: &RefillQuote) -> Self {
        let (id, name) = if quote.is_free() {
            (
                format!("{}-refill-free", product.id),
                format!("{} (Free Refill)", product.name),
            )
        } else {
            (
                format!("{}-refill", product.id),
                format!("{} (Refill)", product.name),
            )
        };

        CartLine {
            id,
            product_id: product.id.clone(),
            name,
            purchase_type: PurchaseType::Refill,
            unit_price: quote.charged_price,
            original_price: Some(product.price),
            quantity: 1,
            points_redeemed: quote.points_redeemed,
        }
    }

    /// Sets the quantity, for building lines with more than one unit.
    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// (original − charged) × quantity, or zero without an original price.
    pub fn savings(&self) -> Money {
        match self.original_price {
            Some(original) => (original - self.unit_price).multiply_quantity(self.quantity),
            None => Money::zero(),
        }
    }

    /// Points this line consumes at checkout.
    pub fn total_points_redeemed(&self) -> u32 {
        let quantity = u32::try_from(self.quantity).unwrap_or(u32::MAX);
        self.points_redeemed.saturating_mul(quantity)
    }

    fn validate(&self) -> CoreResult<()> {
        validate_id("cart line id", &self.id)?;
        validate_id("product id", &self.product_id)?;
        validate_quantity(self.quantity)?;
        validate_price_cents("unit price", self.unit_price.cents())?;
        Ok(())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `id` (adding the same id increases quantity)
/// - Every quantity is in `1..=MAX_LINE_QUANTITY`
/// - At most `MAX_CART_LINES` lines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds a line, or merges its quantity into the line with the same id.
    ///
    /// ## Errors
    /// - `ValidationError` for a bad line or a merged quantity over the maximum
    /// - `CartTooLarge` when a new line would exceed `MAX_CART_LINES`
    pub fn add(&mut self, line: CartLine) -> CoreResult<()> {
        line.validate()?;

        if let Some(existing) = self.lines.iter_mut().find(|l| l.id == line.id) {
            let merged = existing.quantity + line.quantity;
            validate_quantity(merged)?;
            existing.quantity = merged;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        self.lines.push(line);
        Ok(())
    }

    /// Removes a line by id.
    ///
    /// ## Errors
    /// - `CartLineNotFound` for unknown ids
    pub fn remove(&mut self, line_id: &str) -> CoreResult<CartLine> {
        let index = self
            .lines
            .iter()
            .position(|l| l.id == line_id)
            .ok_or_else(|| CoreError::CartLineNotFound(line_id.to_string()))?;
        Ok(self.lines.remove(index))
    }

    /// Sets a line's quantity. Zero removes the line.
    ///
    /// ## Errors
    /// - `ValidationError` for negative or over-maximum quantities
    /// - `CartLineNotFound` for unknown ids
    pub fn update_quantity(&mut self, line_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove(line_id).map(|_| ());
        }

        validate_quantity(quantity)?;

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.id == line_id)
            .ok_or_else(|| CoreError::CartLineNotFound(line_id.to_string()))?;
        line.quantity = quantity;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Takes settled lines out of the cart by id and quantity.
    ///
    /// Lines added after `settled` was copied stay, and so do units added
    /// to a settled line in the meantime.
    pub fn remove_settled(&mut self, settled: &[CartLine]) {
        for done in settled {
            let Some(index) = self.lines.iter().position(|l| l.id == done.id) else {
                continue;
            };
            let remaining = self.lines[index].quantity - done.quantity;
            if remaining > 0 {
                self.lines[index].quantity = remaining;
            } else {
                self.lines.remove(index);
            }
        }
    }

    pub fn get(&self, line_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    /// Sum of line totals.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities across lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn savings(&self) -> Money {
        self.lines.iter().map(CartLine::savings).sum()
    }

    /// Points the cart will consume at checkout.
    pub fn points_to_redeem(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.total_points_redeemed()))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether one more unit of any line would still fit.
    pub fn has_room(&self) -> bool {
        self.lines.len() < MAX_CART_LINES
            && self.lines.iter().all(|l| l.quantity < MAX_LINE_QUANTITY)
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Cart summary for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub item_count: i64,
    pub total: Money,
    pub savings: Money,
    pub points_to_redeem: u32,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            item_count: cart.item_count(),
            total: cart.total(),
            savings: cart.savings(),
            points_to_redeem: cart.points_to_redeem(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
