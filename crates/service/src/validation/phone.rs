const MAX_DIGITS: usize = 11;

/// Mask a phone number as it is typed: `(DD) DDDD-DDDD` or `(DD) DDDDD-DDDD`.
///
/// Non-digits are dropped and anything past eleven digits is ignored, so the
/// output always passes [`super::validate_phone`] once enough digits arrive.
pub fn format_phone(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).take(MAX_DIGITS).collect();
    let n = digits.len();

    match n {
        0 => String::new(),
        1..=2 => format!("({digits}"),
        3..=6 => format!("({}) {}", &digits[..2], &digits[2..]),
        7..=10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        _ => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
    }
}
