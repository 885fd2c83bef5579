use std::sync::Arc;

use tracing::{debug, warn};

use crate::session::SessionStore;

pub const LOGIN_ROUTE: &str = "/auth/login";
pub const HOME_ROUTE: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(String),
}

impl RouteDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Allow or redirect navigation based on the current session.
///
/// Both checks go through [`SessionStore::is_valid`], so an expired session
/// found here is cleared as a side effect.
#[derive(Clone)]
pub struct RouteGate {
    session: Arc<SessionStore>,
}

impl RouteGate {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    async fn authenticated(&self) -> bool {
        match self.session.is_valid().await {
            Ok(valid) => valid,
            Err(e) => {
                warn!(error = %e, "session check failed, treating as signed out");
                false
            }
        }
    }

    /// Protected routes: signed-out users go to the login page, carrying
    /// where they wanted to go.
    pub async fn require_authenticated(&self, requested: &str) -> RouteDecision {
        if self.authenticated().await {
            return RouteDecision::Allow;
        }
        debug!(requested, "redirecting to login");
        RouteDecision::Redirect(login_redirect(requested))
    }

    /// Guest-only routes such as login and registration.
    pub async fn require_guest(&self) -> RouteDecision {
        if self.authenticated().await {
            RouteDecision::Redirect(HOME_ROUTE.to_string())
        } else {
            RouteDecision::Allow
        }
    }
}

pub fn login_redirect(requested: &str) -> String {
    let target = sanitize(requested).unwrap_or(HOME_ROUTE);
    format!("{LOGIN_ROUTE}?returnUrl={}", urlencoding::encode(target))
}

/// Where to go after login, given the raw `returnUrl` query value.
///
/// Only same-site paths are honored; anything else falls back to the home route.
pub fn return_url(query_value: Option<&str>) -> String {
    let Some(raw) = query_value else {
        return HOME_ROUTE.to_string();
    };
    let decoded = match urlencoding::decode(raw) {
        Ok(d) => d.into_owned(),
        Err(_) => return HOME_ROUTE.to_string(),
    };
    sanitize(&decoded).unwrap_or(HOME_ROUTE).to_string()
}

fn sanitize(path: &str) -> Option<&str> {
    let path = path.trim();
    let local = path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.chars().any(char::is_control);
    (local && !path.starts_with(LOGIN_ROUTE)).then_some(path)
}
