//! # Database State
//!
//! Wraps the `Database` handle for use in commands.
//!
//! ## Thread Safety
//! `Database` holds a `SqlitePool`, which is already safe to share; commands
//! use it concurrently without extra locking.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn login(db: &DbState, session: &SessionState, ...) -> Result<User, ApiError> {
//!     let user = db.inner().accounts().login(&email, &password).await?;
//!     ...
//! }
//! ```

use refillhub_store::Database;

#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
