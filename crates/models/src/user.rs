use serde::{Deserialize, Serialize};

/// Server-side user record, as returned by `/auth/me`, `/auth/registrar` and
/// embedded in the login response.
///
/// Treated as an immutable snapshot: a refresh replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(rename = "primeiro_nome")]
    pub first_name: String,
    #[serde(rename = "ultimo_nome")]
    pub last_name: String,
    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "ativo")]
    pub active: bool,
    /// Server timestamp, kept verbatim (naive ISO-8601).
    #[serde(rename = "criado_em")]
    pub created_at: String,
    #[serde(rename = "atualizado_em")]
    pub updated_at: String,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
