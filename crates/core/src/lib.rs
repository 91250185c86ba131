//! `portal-core`: shared primitives for the console session layer.
//!
//! This crate contains **pure** value types (no IO, no claims parsing).

pub mod credential;
pub mod id;

pub use credential::Credential;
pub use id::{InvalidUserId, UserId};
