//! Local authentication gate.
//!
//! Accounts and the active session live in the same persistent store as the
//! rest of the user's data, hashed with a fixed unsalted digest. This keeps
//! the three features behind a login; it is not meant to protect the data
//! from anyone with access to the store.

mod credentials;
mod session;
mod validation;

pub use credentials::{CredentialStore, SessionUser, User, USERS_KEY};
pub use session::{SessionManager, SESSION_KEY};
pub use validation::{hash_password, validate_email, validate_password_strength};
