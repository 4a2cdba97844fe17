use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationErrors;

pub static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]+$").unwrap());
pub static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());
pub static MOBILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").unwrap());

pub const PASSWORD_MESSAGE: &str = "Password must be 6-20 characters, include letters and numbers.";

/// 6-20 characters, at least one letter and one digit, limited symbol set.
/// Expressed in code because the rule is a conjunction of lookaheads.
pub fn check_password_strength(password: &str) -> std::result::Result<(), &'static str> {
    let len = password.chars().count();
    if !(6..=20).contains(&len) {
        return Err(PASSWORD_MESSAGE);
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(PASSWORD_MESSAGE);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PASSWORD_MESSAGE);
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || "@$!%*#?&".contains(c);
    if !password.chars().all(allowed) {
        return Err(PASSWORD_MESSAGE);
    }
    Ok(())
}

/// The form layer renders one message at a time; pick the first.
pub fn first_message(errors: &ValidationErrors) -> String {
    for errs in errors.field_errors().values() {
        if let Some(err) = errs.first() {
            if let Some(message) = &err.message {
                return message.to_string();
            }
            return err.code.to_string();
        }
    }
    "Validation failed".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_letters_only() {
        assert!(NAME_RE.is_match("Alice"));
        assert!(!NAME_RE.is_match("Alice1"));
        assert!(!NAME_RE.is_match("Al ice"));
    }

    #[test]
    fn username_charset() {
        assert!(USERNAME_RE.is_match("alice_01"));
        assert!(!USERNAME_RE.is_match("alice-01"));
        assert!(!USERNAME_RE.is_match("alice 01"));
    }

    #[test]
    fn mobile_exactly_ten_digits() {
        assert!(MOBILE_RE.is_match("0123456789"));
        assert!(!MOBILE_RE.is_match("012345678"));
        assert!(!MOBILE_RE.is_match("01234567890"));
        assert!(!MOBILE_RE.is_match("01234abcde"));
    }

    #[test]
    fn password_strength_rules() {
        assert!(check_password_strength("Secur3!").is_ok());
        assert!(check_password_strength("short").is_err());
        assert!(check_password_strength("lettersonly").is_err());
        assert!(check_password_strength("12345678").is_err());
        assert!(check_password_strength("has space1").is_err());
        assert!(check_password_strength(&"a1".repeat(11)).is_err());
    }
}
