//! `portal-auth`: pure claims/authorization boundary for the console.
//!
//! This crate is intentionally decoupled from storage and transport. Decoding
//! here never verifies signatures: every decision it produces is a UX hint and
//! the user-management API stays the real authorization boundary.

pub mod authorize;
pub mod claims;
pub mod identity;
pub mod permissions;
pub mod roles;
pub mod routes;

pub use authorize::{GuardDecision, GuardOutcome, Requirement, SessionView, can, evaluate, explain};
pub use claims::{DecodeError, decode};
pub use identity::Identity;
pub use permissions::{PermissionCode, PermissionSet};
pub use roles::Role;
pub use routes::RouteTable;
