//! Core error types for taskify-core.
//!
//! This module defines the error hierarchy using thiserror. The timer core
//! never surfaces these to its caller; they are used by storage, auth and the
//! configuration layer, and recovered locally wherever the behavior calls for
//! a fallback.

use std::path::PathBuf;
use thiserror::Error;

/// Persistent store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A stored value exists but cannot be decoded.
    #[error("Malformed persisted state under '{key}': {message}")]
    MalformedPersistedState { key: String, message: String },

    /// The durable backend could not be opened, read or written.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A value could not be encoded for storage.
    #[error("Failed to serialize value for '{key}': {message}")]
    Serialize { key: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Authentication and session errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Registration with an email that already has an account
    #[error("Email already exists")]
    EmailTaken,

    /// Login with unknown email or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// A protected feature was used without a session
    #[error("Not logged in")]
    NotAuthenticated,

    /// Registration input rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The credential list could not be persisted
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Email does not look like local@domain.tld
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Password fails the strength rule
    #[error("Password must be at least 8 characters and contain a letter and a digit")]
    WeakPassword,

    /// Required field left blank
    #[error("Field '{0}' must not be empty")]
    Blank(String),

    /// A timer setting outside its accepted range
    #[error("Invalid settings value for '{field}': {message}")]
    InvalidSettingsValue { field: String, message: String },

    /// Task filter name not one of all, active, completed
    #[error("Unknown filter '{0}' (expected all, active or completed)")]
    UnknownFilter(String),
}

/// Failure to produce the completion cue. Logged, never propagated.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// No output device for the cue
    #[error("Notification output unavailable: {0}")]
    Unavailable(String),

    /// Writing the cue failed
    #[error("Failed to play notification: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::StorageUnavailable(err.to_string())
    }
}
