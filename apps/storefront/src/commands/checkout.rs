//! # Checkout Command
//!
//! Settles the cart against the logged-in user and persists the result.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout                                             │
//! │                                                                         │
//! │  1. Copy user + cart ────────────────────────────────────────────────► │
//! │                                                                         │
//! │  2. settle(copy) ─── EmptyCart / InsufficientPoints ──► error, no-op   │
//! │     • records appended, points redeemed then credited                  │
//! │     • first-time flag cleared, cart emptied                            │
//! │                                                                         │
//! │  3. users().save(copy) ─── store failure ─────► STORAGE_UNAVAILABLE,   │
//! │                                                 in-memory state kept   │
//! │                                                                         │
//! │  4. Refresh SessionState; take the settled lines (by id and quantity)  │
//! │     out of CartState, keeping anything added during the save           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use refillhub_core::{settle, CheckoutReceipt};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::{CartState, DbState, SessionState};

/// Checks out the cart now.
pub async fn checkout(
    db: &DbState,
    session: &SessionState,
    cart: &CartState,
) -> Result<CheckoutReceipt, ApiError> {
    checkout_at(db, session, cart, Utc::now()).await
}

/// Checks out the cart with an explicit purchase time.
///
/// ## Errors
/// - `AUTH_ERROR` when nobody is logged in
/// - `VALIDATION_ERROR` for an empty cart
/// - `INSUFFICIENT_POINTS` when free refills exceed the balance
/// - `STORAGE_UNAVAILABLE` when the result cannot be saved; neither the
///   cart nor the session user changes
pub async fn checkout_at(
    db: &DbState,
    session: &SessionState,
    cart: &CartState,
    now: DateTime<Utc>,
) -> Result<CheckoutReceipt, ApiError> {
    debug!(at = %now, "checkout command");

    let mut user = session.require()?;
    let purchased = cart.snapshot();
    let mut settled_cart = purchased.clone();

    let receipt = settle(&mut user, &mut settled_cart, now)?;

    if let Err(e) = db.inner().users().save(&user).await {
        warn!(user_id = %user.id, error = %e, "Checkout could not be saved");
        return Err(ApiError::storage_unavailable());
    }

    if !session.refresh(user) {
        warn!("Session changed during checkout; saved user not swapped in");
    }
    cart.with_cart_mut(|c| c.remove_settled(&purchased.lines));

    info!(
        records = receipt.records.len(),
        total = %receipt.total_charged,
        points_earned = receipt.points_earned,
        points_redeemed = receipt.points_redeemed,
        balance = receipt.reward_points,
        "Checkout complete"
    );

    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::account::signup;
    use crate::commands::offer::{accept_combo, add_original};
    use crate::commands::test_support::fresh_state;
    use crate::error::ErrorCode;
    use refillhub_core::{Catalog, PurchaseType};
    use std::future::{poll_fn, Future};
    use std::pin::pin;
    use std::task::Poll;

    #[tokio::test]
    async fn test_checkout_requires_login() {
        let (db, session, cart) = fresh_state().await;
        let err = checkout(&db, &session, &cart).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthError);
    }

    #[tokio::test]
    async fn test_checkout_empty_cart() {
        let (db, session, cart) = fresh_state().await;
        signup(&db, &session, &cart, "ada@example.com", "secret1", "Ada")
            .await
            .unwrap();

        let err = checkout(&db, &session, &cart).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_checkout_persists_user() {
        let (db, session, cart) = fresh_state().await;
        let catalog = Catalog::standard();
        let user = signup(&db, &session, &cart, "ada@example.com", "secret1", "Ada")
            .await
            .unwrap();
        accept_combo(&catalog, &session, &cart, "1").unwrap();

        let receipt = checkout(&db, &session, &cart).await.unwrap();

        assert_eq!(receipt.records.len(), 1);
        assert_eq!(receipt.records[0].purchase_type, PurchaseType::Original);
        assert_eq!(receipt.total_charged.cents(), 3738);
        assert_eq!(receipt.points_earned, 10);
        assert!(cart.with_cart(|c| c.is_empty()));

        let stored = db.inner().users().get_required(&user.id).await.unwrap();
        assert_eq!(stored.reward_points, 10);
        assert!(!stored.is_first_time);
        assert_eq!(stored.purchase_history.len(), 1);
        assert_eq!(session.current().unwrap(), stored);
    }

    #[tokio::test]
    async fn test_storage_failure_leaves_state_untouched() {
        let (db, session, cart) = fresh_state().await;
        let catalog = Catalog::standard();
        signup(&db, &session, &cart, "ada@example.com", "secret1", "Ada")
            .await
            .unwrap();
        accept_combo(&catalog, &session, &cart, "1").unwrap();
        let user_before = session.current().unwrap();
        let cart_before = cart.snapshot();

        db.inner().close().await;
        let err = checkout(&db, &session, &cart).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::StorageUnavailable);
        assert_eq!(session.current().unwrap(), user_before);
        assert_eq!(cart.snapshot(), cart_before);
    }

    #[tokio::test]
    async fn test_line_added_during_save_stays_in_cart() {
        let (db, session, cart) = fresh_state().await;
        let catalog = Catalog::standard();
        signup(&db, &session, &cart, "ada@example.com", "secret1", "Ada")
            .await
            .unwrap();
        accept_combo(&catalog, &session, &cart, "1").unwrap();

        let mut running = pin!(checkout(&db, &session, &cart));
        let first = poll_fn(|cx| Poll::Ready(running.as_mut().poll(cx))).await;
        add_original(&catalog, &session, &cart, "12").unwrap();
        let receipt = match first {
            Poll::Ready(result) => result.unwrap(),
            Poll::Pending => running.await.unwrap(),
        };

        assert_eq!(receipt.records.len(), 1);
        assert_eq!(receipt.records[0].product_id, "1");
        let ids: Vec<String> = cart.with_cart(|c| c.lines.iter().map(|l| l.id.clone()).collect());
        assert_eq!(ids, vec!["12-original"]);
        assert_eq!(session.require().unwrap().purchase_history.len(), 1);
    }

    #[tokio::test]
    async fn test_logout_during_save_stays_logged_out() {
        let (db, session, cart) = fresh_state().await;
        let catalog = Catalog::standard();
        let user = signup(&db, &session, &cart, "ada@example.com", "secret1", "Ada")
            .await
            .unwrap();
        accept_combo(&catalog, &session, &cart, "1").unwrap();

        let mut running = pin!(checkout(&db, &session, &cart));
        let first = poll_fn(|cx| Poll::Ready(running.as_mut().poll(cx))).await;
        session.clear();
        cart.with_cart_mut(|c| c.clear());
        match first {
            Poll::Ready(result) => result.unwrap(),
            Poll::Pending => running.await.unwrap(),
        };

        assert!(session.current().is_none());
        assert!(cart.with_cart(|c| c.is_empty()));
        let stored = db.inner().users().get_required(&user.id).await.unwrap();
        assert_eq!(stored.purchase_history.len(), 1);
    }
}
