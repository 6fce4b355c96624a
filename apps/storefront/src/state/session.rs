//! # Session State
//!
//! The logged-in user, held in memory between commands.
//!
//! The in-memory `User` is the working copy; the store holds the durable
//! one. Commands that change the user (checkout) settle a clone, persist it,
//! and only then swap it in, so a failed write never leaves the two apart.

use std::sync::{Arc, Mutex};

use refillhub_core::{AuthError, CoreError, User};

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    user: Arc<Mutex<Option<User>>>,
}

impl SessionState {
    pub fn new() -> Self {
        SessionState::default()
    }

    /// Executes a function with read access to the current user, if any.
    pub fn with_user<F, R>(&self, f: F) -> R
    where
        F: FnOnce(Option<&User>) -> R,
    {
        let user = self.user.lock().expect("Session mutex poisoned");
        f(user.as_ref())
    }

    /// Copy of the logged-in user.
    pub fn current(&self) -> Option<User> {
        self.with_user(|u| u.cloned())
    }

    /// The logged-in user, or `NotLoggedIn`.
    pub fn require(&self) -> Result<User, CoreError> {
        self.current()
            .ok_or(CoreError::Auth(AuthError::NotLoggedIn))
    }

    pub fn is_logged_in(&self) -> bool {
        self.with_user(|u| u.is_some())
    }

    /// Replaces the session user.
    pub fn set(&self, user: User) {
        *self.user.lock().expect("Session mutex poisoned") = Some(user);
    }

    /// Swaps in a newer copy of the logged-in user.
    ///
    /// Does nothing and returns `false` when someone else, or nobody, is
    /// logged in by now.
    pub fn refresh(&self, user: User) -> bool {
        let mut current = self.user.lock().expect("Session mutex poisoned");
        match current.as_ref() {
            Some(u) if u.id == user.id => {
                *current = Some(user);
                true
            }
            _ => false,
        }
    }

    /// Logs out in memory.
    pub fn clear(&self) {
        *self.user.lock().expect("Session mutex poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_without_user() {
        let session = SessionState::new();
        assert!(!session.is_logged_in());
        assert!(matches!(
            session.require(),
            Err(CoreError::Auth(AuthError::NotLoggedIn))
        ));
    }

    #[test]
    fn test_set_and_clear() {
        let session = SessionState::new();
        session.set(User::new("u1", "ada@example.com", "Ada"));

        assert_eq!(session.require().unwrap().id, "u1");
        assert_eq!(session.with_user(|u| u.map(|u| u.reward_points)), Some(0));

        session.clear();
        assert!(session.current().is_none());
    }

    #[test]
    fn test_refresh_only_same_user() {
        let session = SessionState::new();
        let mut newer = User::new("u1", "ada@example.com", "Ada");
        newer.reward_points = 40;

        assert!(!session.refresh(newer.clone()));
        assert!(session.current().is_none());

        session.set(User::new("u2", "bob@example.com", "Bob"));
        assert!(!session.refresh(newer.clone()));
        assert_eq!(session.require().unwrap().id, "u2");

        session.set(User::new("u1", "ada@example.com", "Ada"));
        assert!(session.refresh(newer));
        assert_eq!(session.require().unwrap().reward_points, 40);
    }
}
