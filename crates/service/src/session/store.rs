use std::sync::Arc;

use models::{Session, TokenGrant, UserProfile};
use tokio::sync::{broadcast, watch, Mutex};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, info, warn};

use super::clock::Clock;
use crate::errors::ServiceError;
use crate::storage::KeyValueStore;

/// Names of the three persisted session entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub token: String,
    pub expires_at: String,
    pub user: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            token: "financial_token".into(),
            expires_at: "expires_at".into(),
            user: "financial_user".into(),
        }
    }
}

impl From<&configs::SessionConfig> for StorageKeys {
    fn from(cfg: &configs::SessionConfig) -> Self {
        Self {
            token: cfg.token_key.clone(),
            expires_at: cfg.expires_at_key.clone(),
            user: cfg.user_key.clone(),
        }
    }
}

/// What the backing storage currently holds.
enum Stored {
    Empty,
    Valid(Session),
    Expired,
    /// Some keys present, others missing or unparsable.
    Incomplete,
}

/// Queued changes per subscriber before the slowest one starts skipping.
const CHANGE_BUFFER: usize = 64;

/// Holds the current session, mirrors it to a [`KeyValueStore`] and
/// broadcasts every change.
///
/// `state` is the single source for readbacks. Every change is also sent on
/// `changes` while the `state` write lock is held, so a new observer gets
/// the current value and then each later change, none missed or repeated.
/// Expiry is detected lazily: nothing runs in the background,
/// [`SessionStore::is_valid`] clears an expired session when it is asked.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    keys: StorageKeys,
    state: watch::Sender<Option<Session>>,
    changes: broadcast::Sender<Option<Session>>,
    write_lock: Mutex<()>,
}

impl SessionStore {
    /// Restore whatever session the storage holds.
    ///
    /// An expired or partially written session is removed from storage
    /// before the store is returned.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::session::{SessionStore, StorageKeys, SystemClock};
    /// use service::storage::MemoryStore;
    ///
    /// let store = tokio_test::block_on(SessionStore::load(
    ///     Arc::new(MemoryStore::new()),
    ///     Arc::new(SystemClock),
    ///     StorageKeys::default(),
    /// ))
    /// .unwrap();
    /// assert!(store.current_session().is_none());
    /// ```
    pub async fn load(
        storage: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        keys: StorageKeys,
    ) -> Result<Self, ServiceError> {
        let (state, _) = watch::channel(None);
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        let store = Self {
            storage,
            clock,
            keys,
            state,
            changes,
            write_lock: Mutex::new(()),
        };

        match store.read_stored().await? {
            Stored::Valid(session) => {
                debug!(expires_at = session.expires_at, "restored stored session");
                store.publish(Some(session));
            }
            Stored::Empty => {}
            Stored::Expired => {
                info!(event = "session_expired", "stored session expired, clearing");
                store.remove_persisted().await?;
            }
            Stored::Incomplete => {
                warn!(event = "session_incomplete", "stored session incomplete, clearing");
                store.remove_persisted().await?;
            }
        }
        Ok(store)
    }

    /// In-memory session; an expired one reads as absent.
    pub fn current_session(&self) -> Option<Session> {
        let now = self.clock.now_millis();
        self.state.borrow().as_ref().filter(|s| s.is_valid_at(now)).cloned()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.current_session().and_then(|s| s.user)
    }

    pub fn token(&self) -> Option<String> {
        self.current_session().map(|s| s.access_token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_session().is_some()
    }

    /// Stream of the current user: the present value, then one item per change.
    pub fn observe_session(&self) -> impl Stream<Item = Option<UserProfile>> + Send + Unpin + 'static {
        self.observe(|s| s.and_then(|s| s.user))
    }

    /// Stream of the authenticated flag: the present value, then one item per change.
    pub fn observe_authenticated(&self) -> impl Stream<Item = bool> + Send + Unpin + 'static {
        self.observe(|s| s.is_some())
    }

    fn observe<T, F>(&self, project: F) -> impl Stream<Item = T> + Send + Unpin + 'static
    where
        T: Send + 'static,
        F: Fn(Option<Session>) -> T + Copy + Send + 'static,
    {
        // holding the read guard keeps `publish` out until we are subscribed
        let current = self.state.borrow();
        let rx = self.changes.subscribe();
        let first = project((*current).clone());
        drop(current);

        let later = BroadcastStream::new(rx).filter_map(move |change| match change {
            Ok(session) => Some(project(session)),
            Err(e) => {
                warn!(error = %e, "session observer fell behind, changes skipped");
                None
            }
        });
        tokio_stream::once(first).chain(later)
    }

    /// Persist a freshly granted session and announce it.
    ///
    /// Expiry is `now + expires_in` seconds. Nothing is stored when the grant
    /// carries no token or a non-positive lifetime.
    pub async fn establish(&self, grant: &TokenGrant) -> Result<Session, ServiceError> {
        if grant.access_token.is_empty() {
            return Err(ServiceError::InvalidGrant("empty access token".into()));
        }
        if grant.expires_in <= 0 {
            return Err(ServiceError::InvalidGrant(format!("non-positive lifetime {}", grant.expires_in)));
        }

        let _guard = self.write_lock.lock().await;
        let now = self.clock.now_millis();
        let session = Session {
            access_token: grant.access_token.clone(),
            expires_at: now.saturating_add(grant.expires_in.saturating_mul(1000)),
            user: Some(grant.user.clone()),
        };
        self.persist(&session).await?;
        self.publish(Some(session.clone()));
        info!(
            event = "session_established",
            user_id = %grant.user.id,
            expires_at = session.expires_at,
            "session established"
        );
        Ok(session)
    }

    /// Replace the cached profile of the current session.
    ///
    /// Returns `false` (and stores nothing) when no valid session exists.
    pub async fn replace_profile(&self, profile: UserProfile) -> Result<bool, ServiceError> {
        let _guard = self.write_lock.lock().await;
        let Some(mut session) = self.current_session() else {
            debug!(user_id = %profile.id, "no active session, profile not stored");
            return Ok(false);
        };
        session.user = Some(profile);
        self.persist(&session).await?;
        self.publish(Some(session));
        Ok(true)
    }

    /// Drop the session from storage and memory and announce it.
    ///
    /// Memory is cleared even when the storage write fails; the storage
    /// error is still returned.
    pub async fn clear(&self) -> Result<(), ServiceError> {
        let _guard = self.write_lock.lock().await;
        self.clear_locked().await
    }

    /// Check the stored token and expiry, clearing them when stale.
    pub async fn is_valid(&self) -> Result<bool, ServiceError> {
        let _guard = self.write_lock.lock().await;
        match self.read_stored().await? {
            Stored::Valid(session) => {
                if self.state.borrow().is_none() {
                    self.publish(Some(session));
                }
                Ok(true)
            }
            Stored::Empty => {
                if self.state.borrow().is_some() {
                    self.publish(None);
                }
                Ok(false)
            }
            Stored::Expired => {
                info!(event = "session_expired", "session expired, clearing");
                self.clear_locked().await?;
                Ok(false)
            }
            Stored::Incomplete => {
                warn!(event = "session_incomplete", "stored session incomplete, clearing");
                self.clear_locked().await?;
                Ok(false)
            }
        }
    }

    async fn clear_locked(&self) -> Result<(), ServiceError> {
        let res = self.remove_persisted().await;
        self.publish(None);
        if let Err(e) = &res {
            warn!(error = %e, "failed to remove persisted session");
        } else {
            debug!(event = "session_cleared", "session cleared");
        }
        res
    }

    fn publish(&self, session: Option<Session>) {
        self.state.send_modify(|current| {
            *current = session.clone();
            // no observers is fine
            let _ = self.changes.send(session);
        });
    }

    async fn persist(&self, session: &Session) -> Result<(), ServiceError> {
        let mut entries = vec![
            (self.keys.token.clone(), session.access_token.clone()),
            (self.keys.expires_at.clone(), session.expires_at.to_string()),
        ];
        if let Some(user) = &session.user {
            entries.push((self.keys.user.clone(), serde_json::to_string(user)?));
        }
        self.storage.set_all(entries).await
    }

    async fn remove_persisted(&self) -> Result<(), ServiceError> {
        self.storage
            .remove_all(&[&self.keys.token, &self.keys.expires_at, &self.keys.user])
            .await
    }

    async fn read_stored(&self) -> Result<Stored, ServiceError> {
        let token = self.storage.get(&self.keys.token).await?;
        let expires_at = self.storage.get(&self.keys.expires_at).await?;
        let user = self.storage.get(&self.keys.user).await?;

        let (token, raw_expiry) = match (token, expires_at) {
            (Some(token), Some(raw)) => (token, raw),
            (None, None) if user.is_none() => return Ok(Stored::Empty),
            _ => return Ok(Stored::Incomplete),
        };
        let Ok(expires_at) = raw_expiry.trim().parse::<i64>() else {
            return Ok(Stored::Incomplete);
        };
        let user = match user.map(|raw| serde_json::from_str::<UserProfile>(&raw)).transpose() {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "stored profile unreadable, ignoring it");
                None
            }
        };

        let session = Session { access_token: token, expires_at, user };
        if session.is_valid_at(self.clock.now_millis()) {
            Ok(Stored::Valid(session))
        } else {
            Ok(Stored::Expired)
        }
    }
}
