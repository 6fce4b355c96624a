//! # Reminders
//!
//! Selects purchases whose refill is due, and refills coming up soon.
//!
//! Both functions are pure over `(now, history)`: the caller supplies the
//! clock, so the same inputs always give the same reminders.
//!
//! ```text
//!   purchase ──────── 30 days ────────► due ─────► shown (oldest first, max 3)
//!                          │
//!         nextRefillDate - 7 days ──► "coming up" window (0..=7 days left)
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{PurchaseRecord, PurchaseType};
use crate::{MAX_REFILL_REMINDERS, REFILL_INTERVAL_DAYS, UPCOMING_REFILL_WINDOW_DAYS};

const MILLIS_PER_DAY: i64 = 86_400_000;

// =============================================================================
// Refill Due
// =============================================================================

/// An original purchase old enough to need a refill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RefillReminder {
    pub purchase_id: String,
    pub product_id: String,
    pub product_name: String,
    #[ts(as = "String")]
    pub purchase_date: DateTime<Utc>,
    /// Whole days since purchase, rounded down.
    pub days_since_purchase: i64,
}

/// Originals bought at least 30 days before `now`, oldest first, at most 3.
///
/// Ties keep history order. A product bought twice can appear twice.
pub fn refill_due(now: DateTime<Utc>, history: &[PurchaseRecord]) -> Vec<RefillReminder> {
    let threshold = Duration::days(REFILL_INTERVAL_DAYS);

    let mut due: Vec<RefillReminder> = history
        .iter()
        .filter(|p| p.purchase_type == PurchaseType::Original)
        .filter_map(|p| {
            let elapsed = now - p.purchase_date;
            (elapsed >= threshold).then(|| RefillReminder {
                purchase_id: p.id.clone(),
                product_id: p.product_id.clone(),
                product_name: p.product_name.clone(),
                purchase_date: p.purchase_date,
                days_since_purchase: elapsed.num_milliseconds().div_euclid(MILLIS_PER_DAY),
            })
        })
        .collect();

    // sort_by is stable
    due.sort_by(|a, b| b.days_since_purchase.cmp(&a.days_since_purchase));
    due.truncate(MAX_REFILL_REMINDERS);
    due
}

// =============================================================================
// Upcoming
// =============================================================================

/// A refill falling due within the next week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingRefill {
    pub purchase_id: String,
    pub product_id: String,
    pub product_name: String,
    #[ts(as = "String")]
    pub next_refill_date: DateTime<Utc>,
    /// Whole days left, rounded up (0 = due today).
    pub days_until_refill: i64,
}

/// Records whose `nextRefillDate` is between 0 and 7 days away (rounded up),
/// soonest first.
pub fn upcoming_refills(now: DateTime<Utc>, history: &[PurchaseRecord]) -> Vec<UpcomingRefill> {
    let mut upcoming: Vec<UpcomingRefill> = history
        .iter()
        .filter_map(|p| {
            let next = p.next_refill_date?;
            let days = ceil_days(next - now);
            (0..=UPCOMING_REFILL_WINDOW_DAYS)
                .contains(&days)
                .then(|| UpcomingRefill {
                    purchase_id: p.id.clone(),
                    product_id: p.product_id.clone(),
                    product_name: p.product_name.clone(),
                    next_refill_date: next,
                    days_until_refill: days,
                })
        })
        .collect();

    upcoming.sort_by_key(|u| u.next_refill_date);
    upcoming
}

fn ceil_days(span: Duration) -> i64 {
    let millis = span.num_milliseconds();
    let days = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) > 0 {
        days + 1
    } else {
        days
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
