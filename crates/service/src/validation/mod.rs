//! Client-side checks applied to auth form input before anything is sent.
//!
//! Field rules live in [`rules`]; [`forms`] aggregates them per form into
//! [`ValidationErrors`]. Nothing here touches the network or storage.

pub mod forms;
pub mod phone;
pub mod rules;
pub mod strength;

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

pub use forms::{LoginForm, RegistrationForm};
pub use phone::format_phone;
pub use rules::{
    validate_confirmation, validate_email, validate_login_password, validate_phone,
    validate_registration_password, validate_terms,
};
pub use strength::{password_strength, PasswordStrength, StrengthBand};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("invalid format")]
    InvalidFormat,
    #[error("password must contain uppercase, lowercase, number and special character")]
    WeakPassword,
    #[error("values do not match")]
    Mismatch,
    #[error("required")]
    Required,
    #[error("must be at least {min} characters")]
    TooShort { min: usize },
}

/// Field name to messages, in the order the checks ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First message for a field, the one a form would display.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.field(field).first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{field}: {}", messages.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
