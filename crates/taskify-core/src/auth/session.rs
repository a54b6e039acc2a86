//! The current authenticated identity.
//!
//! Owned by the composition root and handed to whoever needs it. The
//! logged-in user is mirrored to the store so a later process picks the
//! session back up.

use super::credentials::{CredentialStore, SessionUser};
use crate::error::AuthError;
use crate::storage::PersistentStore;

pub const SESSION_KEY: &str = "taskify_user";

#[derive(Debug)]
pub struct SessionManager {
    store: PersistentStore,
    credentials: CredentialStore,
    current: Option<SessionUser>,
}

impl SessionManager {
    /// Build a session, restoring a stored login if there is a readable one.
    pub fn restore(store: PersistentStore) -> Self {
        let current = match store.load_json::<SessionUser>(SESSION_KEY) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable session");
                None
            }
        };
        Self {
            credentials: CredentialStore::new(store.clone()),
            store,
            current,
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn current(&self) -> Option<&SessionUser> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// The current user, or [`AuthError::NotAuthenticated`].
    ///
    /// # Errors
    /// Fails when nobody is logged in.
    pub fn require(&self) -> Result<&SessionUser, AuthError> {
        self.current.as_ref().ok_or(AuthError::NotAuthenticated)
    }

    /// Create an account and log straight into it.
    ///
    /// # Errors
    /// See [`CredentialStore::register`].
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> Result<&SessionUser, AuthError> {
        self.credentials.register(name, email, password)?;
        self.login(email, password)
    }

    /// # Errors
    /// Returns [`AuthError::InvalidCredentials`] for an unknown email or a
    /// wrong password.
    pub fn login(&mut self, email: &str, password: &str) -> Result<&SessionUser, AuthError> {
        let user = self
            .credentials
            .verify(email, password)
            .ok_or(AuthError::InvalidCredentials)?;
        self.store.save_json(SESSION_KEY, &user);
        tracing::info!(email = %user.email, "logged in");
        Ok(&*self.current.insert(user))
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.current.take() {
            tracing::info!(email = %user.email, "logged out");
        }
        self.store.remove(SESSION_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_logs_in_and_persists() {
        let store = PersistentStore::in_memory();
        let mut session = SessionManager::restore(store.clone());
        assert!(!session.is_authenticated());

        let user = session.register("Ada", "ada@example.com", "engine123").unwrap().clone();
        assert_eq!(session.current(), Some(&user));

        let restored = SessionManager::restore(store);
        assert_eq!(restored.current(), Some(&user));
    }

    #[test]
    fn stored_session_has_no_password() {
        let store = PersistentStore::in_memory();
        let mut session = SessionManager::restore(store.clone());
        session.register("Ada", "ada@example.com", "engine123").unwrap();
        let raw = store.get(SESSION_KEY).unwrap();
        assert!(!raw.contains("password"));
    }

    #[test]
    fn wrong_password_fails_and_keeps_state() {
        let mut session = SessionManager::restore(PersistentStore::in_memory());
        session.register("Ada", "ada@example.com", "engine123").unwrap();
        session.logout();
        let err = session.login("ada@example.com", "wrong1234").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(session.current().is_none());
        assert!(matches!(session.require(), Err(AuthError::NotAuthenticated)));
    }

    #[test]
    fn logout_clears_stored_session() {
        let store = PersistentStore::in_memory();
        let mut session = SessionManager::restore(store.clone());
        session.register("Ada", "ada@example.com", "engine123").unwrap();
        session.logout();
        assert!(store.get(SESSION_KEY).is_none());
        assert!(!SessionManager::restore(store).is_authenticated());
    }

    #[test]
    fn malformed_session_means_logged_out() {
        let store = PersistentStore::in_memory();
        store.set(SESSION_KEY, "{\"id\": 5");
        assert!(!SessionManager::restore(store).is_authenticated());
    }
}
