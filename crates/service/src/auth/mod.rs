//! Auth module: HTTP client for the remote auth endpoints plus the error
//! classification that turns every failure into one display message.
//!
//! The client owns no state of its own; session changes go through
//! [`crate::session::SessionStore`].

pub mod client;
pub mod errors;

pub use client::AuthClient;
pub use errors::AuthError;
