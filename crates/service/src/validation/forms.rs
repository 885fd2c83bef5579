use std::fmt;

use models::{LoginRequest, RegisterRequest};

use super::rules::{
    password_has_all_classes, validate_confirmation, validate_email, validate_login_password,
    validate_phone, validate_terms, LOGIN_PASSWORD_MIN, REGISTRATION_PASSWORD_MIN,
};
use super::ValidationErrors;

pub const FIELD_EMAIL: &str = "email";
pub const FIELD_PASSWORD: &str = "password";
pub const FIELD_PASSWORD_CONFIRMATION: &str = "password_confirmation";
pub const FIELD_PHONE: &str = "phone";
pub const FIELD_FIRST_NAME: &str = "first_name";
pub const FIELD_LAST_NAME: &str = "last_name";
pub const FIELD_ACCEPT_TERMS: &str = "accept_terms";

const NAME_MIN: usize = 2;

pub const MSG_INVALID_EMAIL: &str = "Invalid email";
pub const MSG_PHONE_FORMAT: &str = "Invalid format. Use: (11) 99999-9999";
pub const MSG_WEAK_PASSWORD: &str = "Password must contain: uppercase, lowercase, number and special character";
pub const MSG_PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const MSG_ACCEPT_TERMS: &str = "You must accept the terms of use";

fn label(field: &str) -> &str {
    match field {
        FIELD_EMAIL => "Email",
        FIELD_PASSWORD => "Password",
        FIELD_PASSWORD_CONFIRMATION => "Password confirmation",
        FIELD_PHONE => "Phone",
        FIELD_FIRST_NAME => "First name",
        FIELD_LAST_NAME => "Last name",
        other => other,
    }
}

fn required(errors: &mut ValidationErrors, field: &str, value: &str) -> bool {
    if value.is_empty() {
        errors.add(field, format!("{} is required", label(field)));
        false
    } else {
        true
    }
}

fn min_length(errors: &mut ValidationErrors, field: &str, value: &str, min: usize) {
    if value.chars().count() < min {
        errors.add(field, format!("{} must be at least {min} characters", label(field)));
    }
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if required(errors, FIELD_EMAIL, email) && validate_email(email).is_err() {
        errors.add(FIELD_EMAIL, MSG_INVALID_EMAIL);
    }
}

#[derive(Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, &self.email);
        if required(&mut errors, FIELD_PASSWORD, &self.password) && validate_login_password(&self.password).is_err() {
            min_length(&mut errors, FIELD_PASSWORD, &self.password, LOGIN_PASSWORD_MIN);
        }
        errors
    }

    pub fn into_request(self) -> Result<LoginRequest, ValidationErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(LoginRequest { email: self.email, password: self.password })
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm").field("email", &self.email).finish_non_exhaustive()
    }
}

#[derive(Clone, Default)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Optional; empty means not provided.
    pub phone: String,
    pub password: String,
    pub password_confirmation: String,
    pub accept_terms: bool,
}

impl RegistrationForm {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        for (field, value) in [(FIELD_FIRST_NAME, &self.first_name), (FIELD_LAST_NAME, &self.last_name)] {
            if required(&mut errors, field, value) {
                min_length(&mut errors, field, value, NAME_MIN);
            }
        }

        check_email(&mut errors, &self.email);

        if validate_phone(&self.phone).is_err() {
            errors.add(FIELD_PHONE, MSG_PHONE_FORMAT);
        }

        if required(&mut errors, FIELD_PASSWORD, &self.password) {
            min_length(&mut errors, FIELD_PASSWORD, &self.password, REGISTRATION_PASSWORD_MIN);
            if !password_has_all_classes(&self.password) {
                errors.add(FIELD_PASSWORD, MSG_WEAK_PASSWORD);
            }
        }

        if required(&mut errors, FIELD_PASSWORD_CONFIRMATION, &self.password_confirmation)
            && validate_confirmation(&self.password, &self.password_confirmation).is_err()
        {
            errors.add(FIELD_PASSWORD_CONFIRMATION, MSG_PASSWORD_MISMATCH);
        }

        if validate_terms(self.accept_terms).is_err() {
            errors.add(FIELD_ACCEPT_TERMS, MSG_ACCEPT_TERMS);
        }

        errors
    }

    pub fn into_request(self) -> Result<RegisterRequest, ValidationErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(RegisterRequest {
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: Some(self.phone).filter(|p| !p.is_empty()),
            password: self.password,
            password_confirmation: self.password_confirmation,
        })
    }
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("accept_terms", &self.accept_terms)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_registration() -> RegistrationForm {
        RegistrationForm {
            first_name: "Ana".into(),
            last_name: "Souza".into(),
            email: "ana@example.com".into(),
            phone: "(11) 99999-8888".into(),
            password: "Secret1!".into(),
            password_confirmation: "Secret1!".into(),
            accept_terms: true,
        }
    }

    #[test]
    fn login_form_reports_each_field() {
        let errors = LoginForm::default().validate();
        assert_eq!(errors.first(FIELD_EMAIL), Some("Email is required"));
        assert_eq!(errors.first(FIELD_PASSWORD), Some("Password is required"));

        let errors = LoginForm::new("nope", "12345").validate();
        assert_eq!(errors.field(FIELD_EMAIL), [MSG_INVALID_EMAIL]);
        assert_eq!(errors.field(FIELD_PASSWORD), ["Password must be at least 6 characters"]);
    }

    #[test]
    fn valid_login_form_becomes_request() {
        let req = LoginForm::new("ana@example.com", "123456").into_request().unwrap();
        assert_eq!(req.email, "ana@example.com");
        assert_eq!(req.password, "123456");
    }

    #[test]
    fn valid_registration_has_no_errors() {
        assert!(valid_registration().validate().is_empty());
    }

    #[test]
    fn weak_short_password_collects_both_messages() {
        let form = RegistrationForm { password: "abc".into(), password_confirmation: "abc".into(), ..valid_registration() };
        let errors = form.validate();
        assert_eq!(
            errors.field(FIELD_PASSWORD),
            ["Password must be at least 8 characters", MSG_WEAK_PASSWORD]
        );
        assert!(!errors.has(FIELD_PASSWORD_CONFIRMATION));
    }

    #[test]
    fn mismatch_and_terms_and_phone() {
        let form = RegistrationForm {
            password_confirmation: "secret1!".into(),
            accept_terms: false,
            phone: "11999998888".into(),
            ..valid_registration()
        };
        let errors = form.validate();
        assert_eq!(errors.first(FIELD_PASSWORD_CONFIRMATION), Some(MSG_PASSWORD_MISMATCH));
        assert_eq!(errors.first(FIELD_ACCEPT_TERMS), Some(MSG_ACCEPT_TERMS));
        assert_eq!(errors.first(FIELD_PHONE), Some(MSG_PHONE_FORMAT));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn confirmation_compared_even_without_password() {
        let form = RegistrationForm { password: String::new(), password_confirmation: "x".into(), ..valid_registration() };
        let errors = form.validate();
        assert_eq!(errors.first(FIELD_PASSWORD), Some("Password is required"));
        assert_eq!(errors.field(FIELD_PASSWORD_CONFIRMATION), [MSG_PASSWORD_MISMATCH]);
    }

    #[test]
    fn short_names_rejected() {
        let form = RegistrationForm { first_name: "A".into(), last_name: String::new(), ..valid_registration() };
        let errors = form.validate();
        assert_eq!(errors.first(FIELD_FIRST_NAME), Some("First name must be at least 2 characters"));
        assert_eq!(errors.first(FIELD_LAST_NAME), Some("Last name is required"));
    }

    #[test]
    fn invalid_registration_never_becomes_request() {
        let form = RegistrationForm { accept_terms: false, ..valid_registration() };
        let errors = form.into_request().unwrap_err();
        assert!(errors.has(FIELD_ACCEPT_TERMS));
    }

    #[test]
    fn empty_phone_is_sent_as_absent() {
        let form = RegistrationForm { phone: String::new(), ..valid_registration() };
        let req = form.into_request().unwrap();
        assert_eq!(req.phone, None);
        assert_eq!(req.password_confirmation, "Secret1!");
    }

    #[test]
    fn debug_hides_passwords() {
        let shown = format!("{:?}", valid_registration());
        assert!(!shown.contains("Secret1!"));
    }
}
