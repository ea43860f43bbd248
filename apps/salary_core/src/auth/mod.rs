//! Credential hashing, bearer tokens and the gate shared by protected routes.

pub mod guard;
pub mod password;
pub mod token;

pub use guard::{require_user, CurrentUser};
