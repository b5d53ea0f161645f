//! Records returned by the auth service and the library's error type.
//!
//! Token and user records are immutable once built; they are shared with callers as
//! `Arc` values straight out of the cache.

mod auth_error;
mod token;
mod user;

pub use auth_error::AuthError;
pub use token::{MfaStatus, Token};
pub use user::User;
