use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationFailure;

pub const REGISTRATION_PASSWORD_MIN: usize = 8;
pub const LOGIN_PASSWORD_MIN: usize = 6;
pub const PASSWORD_SPECIALS: &str = "#?!@$%^&*-";

const EMAIL_LOCAL_MAX: usize = 64;
const EMAIL_TOTAL_MAX: usize = 254;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*",
        r"@[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?",
        r"(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    ))
    .expect("email pattern compiles")
});

static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\([0-9]{2}\)\s[0-9]{4,5}-[0-9]{4}$").expect("phone pattern compiles"));

pub fn validate_email(email: &str) -> Result<(), ValidationFailure> {
    if email.len() > EMAIL_TOTAL_MAX {
        return Err(ValidationFailure::InvalidFormat);
    }
    match email.split_once('@') {
        Some((local, _)) if local.len() <= EMAIL_LOCAL_MAX && EMAIL.is_match(email) => Ok(()),
        _ => Err(ValidationFailure::InvalidFormat),
    }
}

pub fn is_password_special(c: char) -> bool {
    PASSWORD_SPECIALS.contains(c)
}

/// Length, digit, both cases and one special from [`PASSWORD_SPECIALS`].
pub fn validate_registration_password(password: &str) -> Result<(), ValidationFailure> {
    let long_enough = password.chars().count() >= REGISTRATION_PASSWORD_MIN;
    let ok = long_enough && password_has_all_classes(password);
    if ok {
        Ok(())
    } else {
        Err(ValidationFailure::WeakPassword)
    }
}

pub(crate) fn password_has_all_classes(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(is_password_special)
}

pub fn validate_login_password(password: &str) -> Result<(), ValidationFailure> {
    if password.chars().count() >= LOGIN_PASSWORD_MIN {
        Ok(())
    } else {
        Err(ValidationFailure::TooShort { min: LOGIN_PASSWORD_MIN })
    }
}

/// Exact comparison: case sensitive, whitespace kept.
pub fn validate_confirmation(password: &str, confirmation: &str) -> Result<(), ValidationFailure> {
    if password == confirmation {
        Ok(())
    } else {
        Err(ValidationFailure::Mismatch)
    }
}

/// Empty is accepted since the phone is optional.
pub fn validate_phone(phone: &str) -> Result<(), ValidationFailure> {
    if phone.is_empty() || PHONE.is_match(phone) {
        Ok(())
    } else {
        Err(ValidationFailure::InvalidFormat)
    }
}

pub fn validate_terms(accepted: bool) -> Result<(), ValidationFailure> {
    if accepted {
        Ok(())
    } else {
        Err(ValidationFailure::Required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        for ok in ["user@example.com", "a.b+tag@mail.example.com.br", "x_y@sub-domain.io"] {
            assert_eq!(validate_email(ok), Ok(()), "{ok}");
        }
        for bad in ["", "plain", "user@", "@example.com", "user@example", "user@-bad.com", "us er@example.com", "a..b@example.com"] {
            assert_eq!(validate_email(bad), Err(ValidationFailure::InvalidFormat), "{bad}");
        }
    }

    #[test]
    fn email_length_limits() {
        let local = "a".repeat(65);
        assert!(validate_email(&format!("{local}@example.com")).is_err());
        let local = "a".repeat(64);
        assert!(validate_email(&format!("{local}@example.com")).is_ok());

        let label = "b".repeat(60);
        let long = format!("user@{label}.{label}.{label}.{label}.{label}.com");
        assert!(long.len() > 254);
        assert!(validate_email(&long).is_err());
    }

    #[test]
    fn registration_password_needs_every_class() {
        assert_eq!(validate_registration_password("Abcdef1!"), Ok(()));
        assert_eq!(validate_registration_password("abcdef1!"), Err(ValidationFailure::WeakPassword));
        assert_eq!(validate_registration_password("ABCDEF1!"), Err(ValidationFailure::WeakPassword));
        assert_eq!(validate_registration_password("Abcdefg!"), Err(ValidationFailure::WeakPassword));
        assert_eq!(validate_registration_password("Abcdefg1"), Err(ValidationFailure::WeakPassword));
        assert_eq!(validate_registration_password("Abc1!"), Err(ValidationFailure::WeakPassword));
        // only the listed specials count
        assert_eq!(validate_registration_password("Abcdef1_"), Err(ValidationFailure::WeakPassword));
    }

    #[test]
    fn login_password_minimum() {
        assert_eq!(validate_login_password("12345"), Err(ValidationFailure::TooShort { min: 6 }));
        assert_eq!(validate_login_password("123456"), Ok(()));
    }

    #[test]
    fn confirmation_is_exact() {
        assert_eq!(validate_confirmation("Secret1!", "Secret1!"), Ok(()));
        assert_eq!(validate_confirmation("", ""), Ok(()));
        assert_eq!(validate_confirmation("Secret1!", "secret1!"), Err(ValidationFailure::Mismatch));
        assert_eq!(validate_confirmation("Secret1!", "Secret1! "), Err(ValidationFailure::Mismatch));
    }

    #[test]
    fn phone_formats() {
        assert_eq!(validate_phone(""), Ok(()));
        assert_eq!(validate_phone("(11) 99999-8888"), Ok(()));
        assert_eq!(validate_phone("(11) 3333-4444"), Ok(()));
        assert_eq!(validate_phone("11999998888"), Err(ValidationFailure::InvalidFormat));
        assert_eq!(validate_phone("(11)99999-8888"), Err(ValidationFailure::InvalidFormat));
        assert_eq!(validate_phone("(11) 333-4444"), Err(ValidationFailure::InvalidFormat));
    }

    #[test]
    fn terms_must_be_accepted() {
        assert_eq!(validate_terms(true), Ok(()));
        assert_eq!(validate_terms(false), Err(ValidationFailure::Required));
    }
}
