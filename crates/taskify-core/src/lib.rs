//! # Taskify Core Library
//!
//! Business logic for Taskify: a task list, a focus timer and a diary behind
//! a local login. The `taskify` CLI is a thin presentation layer over this
//! crate.
//!
//! ## Architecture
//!
//! - **Timer**: a Pomodoro-style state machine ([`TimerEngine`]) driven once
//!   per second by a pluggable tick source through [`FocusTimer`]
//! - **Storage**: a best-effort key/value [`PersistentStore`] over SQLite, and
//!   TOML-based application [`Config`]
//! - **Auth**: registered accounts and the current session
//! - **Tasks / Diary**: small lists persisted as JSON after every change
//!
//! ## Key Components
//!
//! - [`Workspace`]: owns the store and session, gates the features
//! - [`FocusTimer`]: engine plus tick scheduling and event broadcast
//! - [`Event`]: every timer state change

pub mod app;
pub mod auth;
pub mod diary;
pub mod error;
pub mod events;
pub mod ids;
pub mod storage;
pub mod tasks;
pub mod timer;

pub use app::Workspace;
pub use auth::{CredentialStore, SessionManager, SessionUser, User};
pub use diary::{Diary, DiaryEntry};
pub use error::{AuthError, ConfigError, NotifyError, StoreError, ValidationError};
pub use events::Event;
pub use storage::{Config, Database, PersistentStore};
pub use tasks::{TaskCounts, TaskFilter, TaskItem, TaskList};
pub use timer::{
    FocusTimer, ManualTicker, Notifier, TimerEngine, TimerMode, TimerSettings, TimerSnapshot,
    TimerState, TokioTicker,
};
