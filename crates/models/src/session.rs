use serde::{Deserialize, Serialize};

use crate::user::UserProfile;

/// Client-held proof of authentication.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    /// Expiry as milliseconds since the Unix epoch.
    pub expires_at: i64,
    pub user: Option<UserProfile>,
}

impl Session {
    /// A session is valid iff it has a token and its expiry is strictly in the future.
    pub fn is_valid_at(&self, now_millis: i64) -> bool {
        !self.access_token.is_empty() && self.expires_at > now_millis
    }

    /// Milliseconds left before expiry, zero once expired.
    pub fn remaining_millis(&self, now_millis: i64) -> i64 {
        (self.expires_at - now_millis).max(0)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user.as_ref().map(|u| u.id.as_str()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(token: &str, expires_at: i64) -> Session {
        Session { access_token: token.into(), expires_at, user: None }
    }

    #[test]
    fn validity_is_strict() {
        let s = session("T", 1_000);
        assert!(s.is_valid_at(999));
        assert!(!s.is_valid_at(1_000));
        assert!(!s.is_valid_at(1_001));
    }

    #[test]
    fn empty_token_is_never_valid() {
        assert!(!session("", i64::MAX).is_valid_at(0));
    }

    #[test]
    fn remaining_clamps_at_zero() {
        let s = session("T", 5_000);
        assert_eq!(s.remaining_millis(4_000), 1_000);
        assert_eq!(s.remaining_millis(9_000), 0);
    }
}
