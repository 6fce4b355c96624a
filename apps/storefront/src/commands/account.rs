//! # Account Commands
//!
//! Signup, login, logout and session restore.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  restore_session() ──► session:current in store? ──► SessionState      │
//! │                                                                         │
//! │  signup() / login() ──► AccountRepository ──► session:current = id     │
//! │                                          └──► SessionState = User      │
//! │                                                                         │
//! │  logout() ──► SessionState = None, CartState cleared                  │
//! │          └──► session:current removed (failure only logged)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use refillhub_core::User;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::{CartState, DbState, SessionState};

/// Creates an account and logs it in.
///
/// ## Returns
/// The new user: 0 points, first-time buyer
pub async fn signup(
    db: &DbState,
    session: &SessionState,
    cart: &CartState,
    email: &str,
    password: &str,
    name: &str,
) -> Result<User, ApiError> {
    debug!(email = %email, "signup command");

    let user = db.inner().accounts().signup(email, password, name).await?;
    start_session(db, session, cart, user).await
}

/// Verifies credentials and logs the user in.
///
/// Logging in as someone else drops the previous shopper's cart.
pub async fn login(
    db: &DbState,
    session: &SessionState,
    cart: &CartState,
    email: &str,
    password: &str,
) -> Result<User, ApiError> {
    debug!(email = %email, "login command");

    let user = db.inner().accounts().login(email, password).await?;
    start_session(db, session, cart, user).await
}

/// Logs out and empties the cart.
///
/// The in-memory logout always happens. A stored session that cannot be
/// cleared is logged and left for the next `restore_session`.
pub async fn logout(
    db: &DbState,
    session: &SessionState,
    cart: &CartState,
) -> Result<(), ApiError> {
    debug!("logout command");

    session.clear();
    cart.with_cart_mut(|c| c.clear());

    if let Err(e) = db.inner().session().clear().await {
        warn!(error = %e, "Stored session could not be cleared");
    }

    info!("Logged out");
    Ok(())
}

/// The logged-in user, if any.
pub fn current_user(session: &SessionState) -> Option<User> {
    debug!("current_user command");
    session.current()
}

/// Reloads the user recorded in the store's session pointer.
///
/// Called once at startup.
pub async fn restore_session(
    db: &DbState,
    session: &SessionState,
) -> Result<Option<User>, ApiError> {
    debug!("restore_session command");

    let user = db.inner().session().current_user().await?;
    match &user {
        Some(u) => {
            info!(user_id = %u.id, "Session restored");
            session.set(u.clone());
        }
        None => session.clear(),
    }
    Ok(user)
}

async fn start_session(
    db: &DbState,
    session: &SessionState,
    cart: &CartState,
    user: User,
) -> Result<User, ApiError> {
    db.inner().session().set(&user.id).await?;

    let same_shopper = session.with_user(|u| u.map_or(false, |u| u.id == user.id));
    if !same_shopper {
        cart.with_cart_mut(|c| c.clear());
    }

    session.set(user.clone());
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::fresh_state;
    use crate::error::ErrorCode;
    use refillhub_core::{CartLine, Catalog};

    #[tokio::test]
    async fn test_signup_logs_in() {
        let (db, session, cart) = fresh_state().await;

        let user = signup(&db, &session, &cart, "Ada@Example.com", "secret1", "Ada")
            .await
            .unwrap();

        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.reward_points, 0);
        assert!(user.is_first_time);
        assert_eq!(current_user(&session).unwrap().id, user.id);
        assert_eq!(
            db.inner().session().get().await.unwrap().as_deref(),
            Some(user.id.as_str())
        );
    }

    #[tokio::test]
    async fn test_signup_duplicate_email() {
        let (db, session, cart) = fresh_state().await;
        signup(&db, &session, &cart, "ada@example.com", "secret1", "Ada")
            .await
            .unwrap();

        let err = signup(&db, &session, &cart, "ADA@example.com", "other12", "Ada 2")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthError);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (db, session, cart) = fresh_state().await;
        signup(&db, &session, &cart, "ada@example.com", "secret1", "Ada")
            .await
            .unwrap();
        logout(&db, &session, &cart).await.unwrap();

        let err = login(&db, &session, &cart, "ada@example.com", "wrong!!")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthError);
        assert!(current_user(&session).is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_cart_and_session() {
        let (db, session, cart) = fresh_state().await;
        signup(&db, &session, &cart, "ada@example.com", "secret1", "Ada")
            .await
            .unwrap();
        let catalog = Catalog::standard();
        cart.with_cart_mut(|c| c.add(CartLine::original(catalog.get("3").unwrap())))
            .unwrap();

        logout(&db, &session, &cart).await.unwrap();

        assert!(current_user(&session).is_none());
        assert!(cart.with_cart(|c| c.is_empty()));
        assert!(db.inner().session().get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_with_store_down() {
        let (db, session, cart) = fresh_state().await;
        signup(&db, &session, &cart, "ada@example.com", "secret1", "Ada")
            .await
            .unwrap();
        let catalog = Catalog::standard();
        cart.with_cart_mut(|c| c.add(CartLine::original(catalog.get("3").unwrap())))
            .unwrap();

        db.inner().close().await;
        logout(&db, &session, &cart).await.unwrap();

        assert!(current_user(&session).is_none());
        assert!(cart.with_cart(|c| c.is_empty()));
    }

    #[tokio::test]
    async fn test_restore_session() {
        let (db, session, cart) = fresh_state().await;
        let user = signup(&db, &session, &cart, "ada@example.com", "secret1", "Ada")
            .await
            .unwrap();

        let fresh_session = SessionState::new();
        let restored = restore_session(&db, &fresh_session).await.unwrap();

        assert_eq!(restored.map(|u| u.id), Some(user.id.clone()));
        assert_eq!(fresh_session.current().unwrap().id, user.id);
    }

    #[tokio::test]
    async fn test_restore_without_session() {
        let (db, session, _cart) = fresh_state().await;
        assert!(restore_session(&db, &session).await.unwrap().is_none());
        assert!(!session.is_logged_in());
    }
}
