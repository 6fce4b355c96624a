//! # Session Repository
//!
//! Remembers which user is logged in across restarts (`session:current`).

use refillhub_core::User;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::kv::KvRepository;
use crate::repository::users::UserRepository;

const CURRENT_SESSION_KEY: &str = "session:current";

#[derive(Debug, Clone)]
pub struct SessionRepository {
    kv: KvRepository,
}

impl SessionRepository {
    pub fn new(kv: KvRepository) -> Self {
        SessionRepository { kv }
    }

    /// Points the session at `user_id`.
    pub async fn set(&self, user_id: &str) -> DbResult<()> {
        debug!(user_id = %user_id, "Session set");
        self.kv.set_json(CURRENT_SESSION_KEY, &user_id).await
    }

    /// Id of the logged-in user, if any.
    pub async fn get(&self) -> DbResult<Option<String>> {
        self.kv.get_json(CURRENT_SESSION_KEY).await
    }

    /// Loads the logged-in user.
    ///
    /// A session pointing at a user that no longer exists is cleared and
    /// treated as logged out.
    pub async fn current_user(&self) -> DbResult<Option<User>> {
        let Some(user_id) = self.get().await? else {
            return Ok(None);
        };

        let user = UserRepository::new(self.kv.clone()).get(&user_id).await?;
        if user.is_none() {
            debug!(user_id = %user_id, "Dropping stale session");
            self.clear().await?;
        }
        Ok(user)
    }

    /// Logs out.
    pub async fn clear(&self) -> DbResult<()> {
        self.kv.remove(CURRENT_SESSION_KEY).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use refillhub_core::User;

    #[tokio::test]
    async fn test_set_get_clear() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let session = db.session();

        assert_eq!(session.get().await.unwrap(), None);

        session.set("u1").await.unwrap();
        assert_eq!(session.get().await.unwrap().as_deref(), Some("u1"));

        session.clear().await.unwrap();
        assert_eq!(session.get().await.unwrap(), None);

        // Clearing twice is fine
        session.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_current_user() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = User::new("u1", "ada@example.com", "Ada");
        db.users().save(&user).await.unwrap();

        db.session().set("u1").await.unwrap();
        assert_eq!(db.session().current_user().await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn test_stale_session_is_cleared() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.session().set("ghost").await.unwrap();

        assert_eq!(db.session().current_user().await.unwrap(), None);
        assert_eq!(db.session().get().await.unwrap(), None);
    }
}
