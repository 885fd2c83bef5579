use std::fmt;

use super::rules::{is_password_special, REGISTRATION_PASSWORD_MIN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthBand {
    VeryWeak,
    Weak,
    Fair,
    Good,
    VeryStrong,
}

impl StrengthBand {
    fn from_score(score: u8) -> Option<Self> {
        match score {
            1 => Some(Self::VeryWeak),
            2 => Some(Self::Weak),
            3 => Some(Self::Fair),
            4 => Some(Self::Good),
            5 => Some(Self::VeryStrong),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VeryWeak => "Very weak",
            Self::Weak => "Weak",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::VeryStrong => "Very strong",
        }
    }
}

impl fmt::Display for StrengthBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    pub score: u8,
    pub band: Option<StrengthBand>,
}

impl PasswordStrength {
    pub const MAX_SCORE: u8 = 5;

    pub fn percent(&self) -> u8 {
        self.score * 20
    }

    pub fn label(&self) -> &'static str {
        self.band.map(StrengthBand::label).unwrap_or("")
    }
}

/// One point each for length, lowercase, uppercase, digit and special.
pub fn password_strength(password: &str) -> PasswordStrength {
    let checks = [
        password.chars().count() >= REGISTRATION_PASSWORD_MIN,
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(is_password_special),
    ];
    let score = checks.iter().filter(|hit| **hit).count() as u8;
    PasswordStrength { score, band: StrengthBand::from_score(score) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_no_band() {
        let s = password_strength("");
        assert_eq!(s.score, 0);
        assert_eq!(s.band, None);
        assert_eq!(s.percent(), 0);
        assert_eq!(s.label(), "");
    }

    #[test]
    fn bands_follow_score() {
        assert_eq!(password_strength("abc").band, Some(StrengthBand::VeryWeak));
        assert_eq!(password_strength("abcABC").band, Some(StrengthBand::Weak));
        assert_eq!(password_strength("abcABC12").band, Some(StrengthBand::Good));

        let s = password_strength("abcdefgh");
        assert_eq!((s.score, s.band), (2, Some(StrengthBand::Weak)));

        let s = password_strength("Abcdef1!");
        assert_eq!(s.score, PasswordStrength::MAX_SCORE);
        assert_eq!(s.percent(), 100);
        assert_eq!(s.label(), "Very strong");
    }

    #[test]
    fn fair_is_sixty_percent() {
        let s = password_strength("aB1");
        assert_eq!(s.band, Some(StrengthBand::Fair));
        assert_eq!(s.percent(), 60);
    }
}
