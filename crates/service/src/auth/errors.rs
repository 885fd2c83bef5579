use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";
pub const INVALID_DATA: &str = "Invalid data";
pub const INVALID_CREDENTIALS: &str = "Incorrect email or password";
pub const SERVER_ERROR: &str = "Internal server error";

/// Failure of an auth operation, reduced to the text shown to the user.
///
/// Callers get no status codes or error kinds, only [`AuthError::message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthError {
    message: String,
}

impl AuthError {
    /// Transport failures, undecodable bodies, local storage failures.
    pub fn unexpected() -> Self {
        Self { message: UNEXPECTED_ERROR.into() }
    }

    /// Same text as a 401 from the server.
    pub fn unauthorized() -> Self {
        Self { message: INVALID_CREDENTIALS.into() }
    }

    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        Self { message: message_for(status, body) }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_message(self) -> String {
        self.message
    }
}

/// Resolve the display message for a non-success response.
///
/// | status | message |
/// |--------|---------|
/// | 400 | `detail` string, else [`INVALID_DATA`] |
/// | 401 | [`INVALID_CREDENTIALS`] |
/// | 422 | `detail[].msg` joined by `", "`, or the `detail` string |
/// | 500 | [`SERVER_ERROR`] |
/// | other | [`UNEXPECTED_ERROR`] |
pub fn message_for(status: StatusCode, body: &[u8]) -> String {
    let detail = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| match v {
            Value::Object(mut map) => map.remove("detail"),
            _ => None,
        });

    match status {
        StatusCode::BAD_REQUEST => match detail {
            Some(Value::String(s)) if !s.is_empty() => s,
            _ => INVALID_DATA.into(),
        },
        StatusCode::UNAUTHORIZED => INVALID_CREDENTIALS.into(),
        StatusCode::UNPROCESSABLE_ENTITY => match detail {
            Some(Value::Array(items)) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if messages.is_empty() {
                    UNEXPECTED_ERROR.into()
                } else {
                    messages.join(", ")
                }
            }
            Some(Value::String(s)) if !s.is_empty() => s,
            _ => UNEXPECTED_ERROR.into(),
        },
        StatusCode::INTERNAL_SERVER_ERROR => SERVER_ERROR.into(),
        _ => UNEXPECTED_ERROR.into(),
    }
}
