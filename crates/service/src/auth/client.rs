use std::sync::Arc;

use configs::ApiConfig;
use models::{LoginRequest, RegisterRequest, Session, TokenGrant, UserProfile};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};

use super::errors::AuthError;
use crate::errors::ServiceError;
use crate::session::SessionStore;

pub const REGISTER_PATH: &str = "/auth/registrar";
pub const LOGIN_PATH: &str = "/auth/login";
pub const PROFILE_PATH: &str = "/auth/me";
pub const LOGOUT_PATH: &str = "/auth/logout";

/// Client for the remote auth API.
///
/// Every operation resolves or fails exactly once; nothing is retried.
/// A 401 from any endpoint clears the local session.
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl AuthClient {
    pub fn new(cfg: &ApiConfig, session: Arc<SessionStore>) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout())
            .connect_timeout(cfg.connect_timeout())
            .user_agent(concat!("finance-auth/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ServiceError::HttpClient(e.to_string()))?;
        Ok(Self::with_client(http, cfg.base_url.clone(), session))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>, session: Arc<SessionStore>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url, session }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Create an account. No session is established; the user logs in afterwards.
    #[instrument(skip_all, fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserProfile, AuthError> {
        let sent = self.http.post(self.url(REGISTER_PATH)).json(request).send().await;
        let user: UserProfile = self.read_json(sent).await?;
        info!(event = "user_registered", user_id = %user.id, "account created, login required");
        Ok(user)
    }

    /// Exchange credentials for a session and persist it.
    ///
    /// On any failure no session is left behind.
    #[instrument(skip_all, fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &LoginRequest) -> Result<Session, AuthError> {
        let sent = self.http.post(self.url(LOGIN_PATH)).json(credentials).send().await;
        let grant: TokenGrant = self.read_json(sent).await?;

        match self.session.establish(&grant).await {
            Ok(session) => {
                info!(
                    event = "login_succeeded",
                    user_id = %grant.user.id,
                    first_name = %grant.user.first_name,
                    "welcome"
                );
                Ok(session)
            }
            Err(e) => {
                error!(event = "session_persist_failed", error = %e, "login accepted but session not stored");
                self.clear_session().await;
                Err(AuthError::unexpected())
            }
        }
    }

    /// Re-read the profile of the logged-in user and cache it in the session.
    #[instrument(skip_all)]
    pub async fn fetch_profile(&self) -> Result<UserProfile, AuthError> {
        let Some(token) = self.session.token() else {
            debug!("no valid session, profile not requested");
            self.clear_session().await;
            return Err(AuthError::unauthorized());
        };

        let sent = self.http.get(self.url(PROFILE_PATH)).bearer_auth(&token).send().await;
        let user: UserProfile = self.read_json(sent).await?;

        match self.session.replace_profile(user.clone()).await {
            Ok(true) => debug!(user_id = %user.id, "profile refreshed"),
            Ok(false) => debug!(user_id = %user.id, "session ended while profile was in flight"),
            Err(e) => {
                warn!(error = %e, "refreshed profile not stored");
                return Err(AuthError::unexpected());
            }
        }
        Ok(user)
    }

    /// End the session locally, then tell the server on a best-effort basis.
    #[instrument(skip_all)]
    pub async fn logout(&self) -> Result<(), AuthError> {
        let token = self.session.token();
        let cleared = self.session.clear().await;

        if let Some(token) = token {
            match self.http.post(self.url(LOGOUT_PATH)).bearer_auth(&token).send().await {
                Ok(resp) if resp.status().is_success() => debug!("server acknowledged logout"),
                Ok(resp) => debug!(status = resp.status().as_u16(), "server logout not acknowledged"),
                Err(e) => debug!(error = %e, "server logout unreachable"),
            }
        }
        info!(event = "logout", "session ended");

        cleared.map_err(|e| {
            warn!(error = %e, "session storage not cleared");
            AuthError::unexpected()
        })
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        sent: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<T, AuthError> {
        let resp = sent.map_err(|e| {
            warn!(error = %e, "request failed before a response arrived");
            AuthError::unexpected()
        })?;

        let status = resp.status();
        if status.is_success() {
            return resp.json::<T>().await.map_err(|e| {
                warn!(status = status.as_u16(), error = %e, "response body did not decode");
                AuthError::unexpected()
            });
        }

        let body = resp.bytes().await.unwrap_or_default();
        let err = AuthError::from_response(status, &body);
        warn!(status = status.as_u16(), message = %err, "request rejected");
        if status == StatusCode::UNAUTHORIZED {
            self.clear_session().await;
        }
        Err(err)
    }

    async fn clear_session(&self) {
        if let Err(e) = self.session.clear().await {
            warn!(error = %e, "session storage not cleared");
        }
    }
}
