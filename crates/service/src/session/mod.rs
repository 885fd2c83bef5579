//! Client-side session lifecycle: persistence, validity and change broadcast.

pub mod clock;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{SessionStore, StorageKeys};
