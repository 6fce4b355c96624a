//! # Account Repository
//!
//! Signup and login against credentials stored under `account:{email}`.
//!
//! ## Signup
//! ```text
//! signup(email, password, name)
//!      │
//!      ├── validate + normalize email (lowercase)
//!      ├── account:{email} exists? ──► AuthError::DuplicateEmail
//!      ├── argon2 hash (random salt)
//!      │
//!      ▼  one transaction
//! ┌───────────────────────────────────────────────┐
//! │ INSERT account:{email} → { userId, hash, … }  │
//! │ UPSERT user:{id}       → User (0 pts, first)  │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Only the PHC-format hash is stored. Unknown email and wrong password
//! produce the same `InvalidCredentials` error.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use refillhub_core::validation::{validate_display_name, validate_email, validate_password};
use refillhub_core::{AuthError, CoreError, User};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::kv::{self, KvRepository};
use crate::repository::users::{user_key, UserRepository};

const ACCOUNT_PREFIX: &str = "account:";

fn account_key(email: &str) -> String {
    format!("{ACCOUNT_PREFIX}{email}")
}

/// Stored credentials for one email.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAccount {
    pub user_id: String,
    pub email: String,
    /// Argon2 PHC string (`$argon2id$v=19$…`).
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Repository for signup and login.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    fn kv(&self) -> KvRepository {
        KvRepository::new(self.pool.clone())
    }

    fn users(&self) -> UserRepository {
        UserRepository::new(self.kv())
    }

    /// Creates an account and its user record.
    ///
    /// The new user starts with 0 points and `is_first_time = true`.
    ///
    /// ## Errors
    /// - `Domain(Validation)` for a malformed email, short password or empty name
    /// - `Domain(Auth(DuplicateEmail))` when the email is already registered
    pub async fn signup(&self, email: &str, password: &str, name: &str) -> DbResult<User> {
        let email = validate_email(email).map_err(CoreError::from)?;
        validate_password(password).map_err(CoreError::from)?;
        let name = validate_display_name(name).map_err(CoreError::from)?;

        debug!(email = %email, "Signup requested");

        if self.exists(&email).await? {
            return Err(AuthError::DuplicateEmail(email).into());
        }

        let user = User::new(Uuid::new_v4().to_string(), email.clone(), name);
        let account = StoredAccount {
            user_id: user.id.clone(),
            email: email.clone(),
            password_hash: hash_password(password)?,
            created_at: Utc::now(),
        };

        let account_json = serde_json::to_string(&account)?;
        let user_json = serde_json::to_string(&user)?;

        let mut tx = self.pool.begin().await?;

        // Plain INSERT so a concurrent signup for the same email loses here
        let inserted = sqlx::query("INSERT INTO kv_store (key, value) VALUES (?, ?)")
            .bind(account_key(&email))
            .bind(&account_json)
            .execute(&mut *tx)
            .await;

        match inserted.map_err(DbError::from) {
            Ok(_) => {}
            Err(DbError::UniqueViolation { .. }) => {
                return Err(AuthError::DuplicateEmail(email).into());
            }
            Err(e) => return Err(e),
        }

        kv::upsert(&mut *tx, &user_key(&user.id), &user_json).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(user_id = %user.id, email = %email, "Account created");
        Ok(user)
    }

    /// Verifies credentials and returns the account's user.
    ///
    /// ## Errors
    /// - `Domain(Auth(InvalidCredentials))` for an unknown email or wrong password
    /// - `NotFound` if the account exists but its user record is missing
    pub async fn login(&self, email: &str, password: &str) -> DbResult<User> {
        let Ok(email) = validate_email(email) else {
            return Err(AuthError::InvalidCredentials.into());
        };

        let account = self
            .kv()
            .get_json::<StoredAccount>(&account_key(&email))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &account.password_hash) {
            warn!(email = %email, "Login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }

        let user = self.users().get_required(&account.user_id).await?;
        info!(user_id = %user.id, "Logged in");
        Ok(user)
    }

    /// Whether `email` (already normalized) is registered.
    pub async fn exists(&self, email: &str) -> DbResult<bool> {
        Ok(self.kv().get(&account_key(email)).await?.is_some())
    }
}

// =============================================================================
// Hashing
// =============================================================================

fn hash_password(password: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_signup_creates_first_time_user() {
        let db = db().await;
        let user = db
            .accounts()
            .signup("Ada@Example.com", "secret1", " Ada ")
            .await
            .unwrap();

        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.name, "Ada");
        assert_eq!(user.reward_points, 0);
        assert!(user.is_first_time);
        assert!(user.purchase_history.is_empty());

        assert_eq!(db.users().get(&user.id).await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn test_signup_rejects_duplicate_email() {
        let db = db().await;
        db.accounts()
            .signup("ada@example.com", "secret1", "Ada")
            .await
            .unwrap();

        let err = db
            .accounts()
            .signup("ADA@example.com", "another1", "Imposter")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::Auth(AuthError::DuplicateEmail(_)))
        ));
        assert_eq!(db.users().list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_signup_validates_input() {
        let db = db().await;
        let accounts = db.accounts();

        assert!(matches!(
            accounts.signup("not-an-email", "secret1", "Ada").await,
            Err(DbError::Domain(CoreError::Validation(_)))
        ));
        assert!(matches!(
            accounts.signup("ada@example.com", "123", "Ada").await,
            Err(DbError::Domain(CoreError::Validation(_)))
        ));
        assert!(matches!(
            accounts.signup("ada@example.com", "secret1", "  ").await,
            Err(DbError::Domain(CoreError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn test_login() {
        let db = db().await;
        let created = db
            .accounts()
            .signup("ada@example.com", "secret1", "Ada")
            .await
            .unwrap();

        let user = db.accounts().login(" ADA@example.com", "secret1").await.unwrap();
        assert_eq!(user.id, created.id);
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password_and_unknown_email() {
        let db = db().await;
        db.accounts()
            .signup("ada@example.com", "secret1", "Ada")
            .await
            .unwrap();

        for (email, password) in [
            ("ada@example.com", "wrong-pass"),
            ("bob@example.com", "secret1"),
            ("garbage", "secret1"),
        ] {
            let err = db.accounts().login(email, password).await.unwrap_err();
            assert!(
                matches!(
                    err,
                    DbError::Domain(CoreError::Auth(AuthError::InvalidCredentials))
                ),
                "{email}"
            );
        }
    }

    #[tokio::test]
    async fn test_password_is_not_stored_in_plaintext() {
        let db = db().await;
        db.accounts()
            .signup("ada@example.com", "secret1", "Ada")
            .await
            .unwrap();

        let raw = db.kv().get("account:ada@example.com").await.unwrap().unwrap();
        assert!(!raw.contains("secret1"));

        let account: StoredAccount = serde_json::from_str(&raw).unwrap();
        assert!(account.password_hash.starts_with("$argon2"));
    }
}
