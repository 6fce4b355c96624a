//! # User Repository
//!
//! Users persisted as JSON under `user:{id}`.
//!
//! The stored document is the `User` camelCase shape, with the purchase
//! history inline:
//!
//! ```text
//! {
//!   "id": "…", "email": "ada@example.com", "name": "Ada",
//!   "rewardPoints": 40, "isFirstTime": false,
//!   "purchaseHistory": [
//!     { "id": "…", "productId": "1", "productName": "Tide Laundry Detergent",
//!       "type": "original", "quantity": 1, "price": 37.38,
//!       "purchaseDate": "2024-06-01T12:00:00Z",
//!       "nextRefillDate": "2024-07-01T12:00:00Z" }
//!   ]
//! }
//! ```
//!
//! Point and history updates are read-modify-write through the `User`
//! methods, so the core's rules (balance never below zero, append-only
//! history) hold for stored users too.

use refillhub_core::{PurchaseRecord, User};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::kv::KvRepository;

pub(crate) const USER_PREFIX: &str = "user:";

pub(crate) fn user_key(user_id: &str) -> String {
    format!("{USER_PREFIX}{user_id}")
}

/// Repository for user records.
#[derive(Debug, Clone)]
pub struct UserRepository {
    kv: KvRepository,
}

impl UserRepository {
    pub fn new(kv: KvRepository) -> Self {
        UserRepository { kv }
    }

    /// Loads a user, or `None` when no record exists.
    pub async fn get(&self, user_id: &str) -> DbResult<Option<User>> {
        self.kv.get_json(&user_key(user_id)).await
    }

    /// Loads a user that must exist.
    ///
    /// ## Errors
    /// - `NotFound` when no record exists
    pub async fn get_required(&self, user_id: &str) -> DbResult<User> {
        self.get(user_id)
            .await?
            .ok_or_else(|| DbError::not_found("User", user_id))
    }

    /// Writes the whole user record.
    pub async fn save(&self, user: &User) -> DbResult<()> {
        debug!(
            user_id = %user.id,
            points = user.reward_points,
            purchases = user.purchase_history.len(),
            "Saving user"
        );
        self.kv.set_json(&user_key(&user.id), user).await
    }

    /// Adds `delta` points to a stored user and returns the new balance.
    ///
    /// ## Errors
    /// - `NotFound` for unknown users
    /// - `Domain(InsufficientPoints)` when the balance would go negative;
    ///   nothing is written
    pub async fn apply_point_delta(&self, user_id: &str, delta: i64) -> DbResult<u32> {
        let mut user = self.get_required(user_id).await?;
        let balance = user.apply_point_delta(delta)?;
        self.save(&user).await?;

        info!(user_id = %user_id, delta = delta, balance = balance, "Reward points updated");
        Ok(balance)
    }

    /// Appends a purchase to a stored user's history.
    pub async fn append_purchase(&self, user_id: &str, record: PurchaseRecord) -> DbResult<User> {
        let mut user = self.get_required(user_id).await?;
        user.append_purchase(record);
        self.save(&user).await?;
        Ok(user)
    }

    /// Every stored user, ordered by key.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let mut users = Vec::new();
        for key in self.kv.keys_with_prefix(USER_PREFIX).await? {
            if let Some(user) = self.kv.get_json::<User>(&key).await? {
                users.push(user);
            }
        }
        Ok(users)
    }
}
