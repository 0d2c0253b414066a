use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

/// Input validation utilities for the account service

// Compile regex patterns once at startup
// These patterns are hardcoded and always valid, so we use expect() with explicit reasoning
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    // Unicode letters are accepted in the local part; the domain must contain a dot
    Regex::new(r"^[\p{L}0-9._%+-]+@[\p{L}0-9.-]+\.[A-Za-z]{2,}$")
        .expect("hardcoded email regex is invalid - fix source code")
});

static ALIAS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]{3,32}$")
        .expect("hardcoded alias regex is invalid - fix source code")
});

/// Special characters accepted by the password policy.
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>_-";

/// Validate email format
pub fn validate_email(email: &str) -> bool {
    !email.is_empty() && email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

/// Validate alias format (3-32 characters, alphanumeric with - and _)
pub fn validate_alias(alias: &str) -> bool {
    ALIAS_REGEX.is_match(alias)
}

/// First unmet password-policy requirement, or `None` for a compliant password.
///
/// Requirements:
/// - Minimum 8 characters
/// - At least one uppercase letter
/// - At least one lowercase letter
/// - At least one digit
/// - At least one special character from [`PASSWORD_SPECIAL_CHARS`]
pub fn password_policy_violation(password: &str) -> Option<&'static str> {
    if password.len() < 8 {
        return Some("must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Some("must contain an uppercase letter");
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Some("must contain a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some("must contain a digit");
    }
    if !password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
        return Some("must contain a special character");
    }
    None
}

/// Validate password strength
pub fn validate_password(password: &str) -> bool {
    password_policy_violation(password).is_none()
}

/// validator crate compatible custom validator for email shape
pub fn validate_email_shape_validator(email: &str) -> Result<(), ValidationError> {
    if validate_email(email) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_email"))
    }
}

/// validator crate compatible custom validator for alias shape
pub fn validate_alias_shape_validator(alias: &str) -> Result<(), ValidationError> {
    if validate_alias(alias) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_alias"))
    }
}
