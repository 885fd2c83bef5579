//! Wire and domain types for the finance-auth client.
//!
//! Field names follow the remote API (`primeiro_nome`, `senha`, `usuario`...)
//! through serde renames; the Rust side uses English names.

pub mod auth;
pub mod session;
pub mod user;

pub use auth::{LoginRequest, RegisterRequest, TokenGrant};
pub use session::Session;
pub use user::UserProfile;
