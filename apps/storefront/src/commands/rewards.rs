//! # Rewards Commands
//!
//! Points balance and refill reminders for the logged-in shopper. All of
//! these read the in-memory session user; nothing is written.

use chrono::{DateTime, Utc};
use refillhub_core::reminders::{refill_due, upcoming_refills as upcoming};
use refillhub_core::{RefillReminder, UpcomingRefill, FREE_REFILL_POINTS};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::SessionState;

/// Points overview for the header badge and profile page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardsSummary {
    pub reward_points: u32,
    pub can_redeem_free_refill: bool,
    /// 0 once a free refill is available.
    pub points_needed: u32,
    pub free_refill_cost: u32,
}

/// Gets the points summary.
pub fn rewards_summary(session: &SessionState) -> Result<RewardsSummary, ApiError> {
    debug!("rewards_summary command");

    let user = session.require()?;
    Ok(RewardsSummary {
        reward_points: user.reward_points,
        can_redeem_free_refill: user.can_redeem_free_refill(),
        points_needed: user.points_until_free_refill(),
        free_refill_cost: FREE_REFILL_POINTS,
    })
}

/// Originals bought 30 or more days before `now`, longest-waiting first,
/// at most three.
pub fn refill_reminders(
    session: &SessionState,
    now: DateTime<Utc>,
) -> Result<Vec<RefillReminder>, ApiError> {
    debug!(at = %now, "refill_reminders command");
    let user = session.require()?;
    Ok(refill_due(now, &user.purchase_history))
}

/// Refills falling due within the next week.
pub fn upcoming_refills(
    session: &SessionState,
    now: DateTime<Utc>,
) -> Result<Vec<UpcomingRefill>, ApiError> {
    debug!(at = %now, "upcoming_refills command");
    let user = session.require()?;
    Ok(upcoming(now, &user.purchase_history))
}
