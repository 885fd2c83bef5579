//! Auth slice of the finance client.
//! - `session`: persisted token session with observable state.
//! - `auth`: HTTP client for register/login/profile/logout.
//! - `validation`: form rules checked before any request is built.
//! - `guard`: route gating from session validity.

pub mod auth;
pub mod errors;
pub mod guard;
pub mod session;
pub mod storage;
#[cfg(test)]
pub mod test_support;
pub mod validation;

pub use auth::{AuthClient, AuthError};
pub use errors::ServiceError;
pub use guard::{RouteDecision, RouteGate};
pub use session::{SessionStore, StorageKeys};
