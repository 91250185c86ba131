//! `portal-directory`: client for the remote user-management API.
//!
//! Admin views read and replace users, roles and fine-grained permission sets
//! through these traits. Every request carries the session credential as a
//! bearer token; the server decides what is actually allowed.

pub mod directory;
pub mod error;
pub mod http;
pub mod models;

pub use directory::{PermissionDelegate, UserDirectory, provision_user, toggle_permission};
pub use error::ApiError;
pub use http::HttpUserDirectory;
pub use models::{CreateUserRequest, UpdateUserRequest, User};
