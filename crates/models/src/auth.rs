use std::fmt;

use serde::{Deserialize, Serialize};

use crate::user::UserProfile;

/// Body of `POST /auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /auth/registrar`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    #[serde(rename = "primeiro_nome")]
    pub first_name: String,
    #[serde(rename = "ultimo_nome")]
    pub last_name: String,
    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "senha")]
    pub password: String,
    #[serde(rename = "confirmar_senha")]
    pub password_confirmation: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("phone", &self.phone)
            .field("password", &"<redacted>")
            .field("password_confirmation", &"<redacted>")
            .finish()
    }
}

/// Successful login response.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Token lifetime in seconds, as declared by the server.
    pub expires_in: i64,
    #[serde(rename = "usuario")]
    pub user: UserProfile,
}

fn default_token_type() -> String { "bearer".into() }

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("user", &self.user.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_uses_senha() {
        let req = LoginRequest { email: "a@b.com".into(), password: "secret1".into() };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, serde_json::json!({"email": "a@b.com", "senha": "secret1"}));
    }

    #[test]
    fn register_request_omits_missing_phone() {
        let req = RegisterRequest {
            email: "a@b.com".into(),
            first_name: "Ana".into(),
            last_name: "Souza".into(),
            phone: None,
            password: "Secret1!".into(),
            password_confirmation: "Secret1!".into(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("telefone").is_none());
        assert_eq!(value["confirmar_senha"], "Secret1!");
        assert_eq!(value["ultimo_nome"], "Souza");
    }

    #[test]
    fn debug_output_never_shows_secrets() {
        let req = LoginRequest { email: "a@b.com".into(), password: "hunter22".into() };
        let out = format!("{req:?}");
        assert!(out.contains("a@b.com"));
        assert!(!out.contains("hunter22"));
    }

    #[test]
    fn token_grant_decodes_usuario() {
        let raw = r#"{
            "access_token": "T",
            "token_type": "bearer",
            "expires_in": 3600,
            "usuario": {
                "id": "u1", "email": "a@b.com", "primeiro_nome": "Ana", "ultimo_nome": "S",
                "ativo": true, "criado_em": "2024-01-01T00:00:00", "atualizado_em": "2024-01-01T00:00:00"
            }
        }"#;
        let grant: TokenGrant = serde_json::from_str(raw).unwrap();
        assert_eq!(grant.expires_in, 3600);
        assert_eq!(grant.user.first_name, "Ana");
        assert!(!format!("{grant:?}").contains("\"T\""));
    }
}
