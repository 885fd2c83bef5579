//! Shared runtime helpers for the finance-auth workspace.
//!
//! - `utils::logging`: tracing subscriber setup used by binaries and tests.
//! - `env`: filesystem sanity checks for locally persisted state.

pub mod env;
pub mod utils;
