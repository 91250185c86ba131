//! `portal-session`
//!
//! **Responsibility:** client-side session lifecycle.
//!
//! This crate provides:
//! - The durable storage boundary (`KeyValueStore`, in-memory and file backed)
//! - `SessionStore`: load/save/clear of the single persisted credential
//! - `AuthorizationContext`: the explicit, injectable session state consulted
//!   by the access guard
//! - `SessionConfig`: environment-driven configuration
//!
//! The user-management API remains the authority; nothing here verifies tokens.

pub mod config;
pub mod context;
pub mod error;
pub mod storage;
pub mod store;

pub use config::SessionConfig;
pub use context::AuthorizationContext;
pub use error::{SessionError, StorageError};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{Session, SessionStore};
