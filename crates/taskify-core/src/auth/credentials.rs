//! Registered accounts.
//!
//! The whole account list is one JSON array in the persistent store. Emails
//! are compared exactly, as entered (after trimming surrounding whitespace).

use serde::{Deserialize, Serialize};

use super::validation::{hash_password, validate_email, validate_password_strength};
use crate::error::{AuthError, ValidationError};
use crate::ids::next_id;
use crate::storage::PersistentStore;

pub const USERS_KEY: &str = "taskify_users";

/// A stored account. `password` holds the hash, never the plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// The identity of a logged-in user, without the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CredentialStore {
    store: PersistentStore,
}

impl CredentialStore {
    pub fn new(store: PersistentStore) -> Self {
        Self { store }
    }

    /// All accounts. A damaged list reads as empty.
    pub fn users(&self) -> Vec<User> {
        match self.store.load_json::<Vec<User>>(USERS_KEY) {
            Ok(users) => users.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable account list");
                Vec::new()
            }
        }
    }

    pub fn find(&self, email: &str) -> Option<User> {
        let email = email.trim();
        self.users().into_iter().find(|u| u.email == email)
    }

    /// Create an account.
    ///
    /// # Errors
    /// Returns [`AuthError::EmailTaken`] for a known email, or a validation
    /// error for a blank name, malformed email or weak password.
    pub fn register(&self, name: &str, email: &str, password: &str) -> Result<SessionUser, AuthError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(ValidationError::Blank("name".into()).into());
        }
        validate_email(email)?;
        validate_password_strength(password)?;

        let mut users = self.users();
        if users.iter().any(|u| u.email == email) {
            return Err(AuthError::EmailTaken);
        }

        let id = next_id(users.iter().filter_map(|u| u.id.parse::<i64>().ok()));
        let user = User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password: hash_password(password),
        };
        let session_user = SessionUser::from(&user);
        users.push(user);
        self.store.save_json(USERS_KEY, &users);
        tracing::info!(email, "account registered");
        Ok(session_user)
    }

    /// Check an email/password pair.
    pub fn verify(&self, email: &str, password: &str) -> Option<SessionUser> {
        let hashed = hash_password(password);
        self.find(email)
            .filter(|u| u.password == hashed)
            .map(|u| SessionUser::from(&u))
    }
}
