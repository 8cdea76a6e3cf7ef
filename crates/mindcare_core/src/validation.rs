//! crates/mindcare_core/src/validation.rs
//!
//! Field validation rules shared by the repositories and the sign-in flow.
//!
//! Credential checks are format-only. There is no user database behind them:
//! any well-formed email and password pair is accepted.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Minimum password length accepted by the sign-in form.
pub const MIN_PASSWORD_LEN: usize = 6;

const EMAIL_PATTERN: &str = r"\S+@\S+\.\S+";

/// A single rejected field value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
    #[error("Unknown {field} '{value}'")]
    UnknownVariant { field: &'static str, value: String },
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("Captcha does not match")]
    CaptchaMismatch,
    #[error("Please select a service first")]
    ServiceNotSelected,
    #[error("Assessment incomplete: {answered} of {expected} questions answered")]
    IncompleteAssessment { answered: usize, expected: usize },
}

impl ValidationError {
    /// The form field this error belongs to, for inline display.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Required { field }
            | Self::OutOfRange { field, .. }
            | Self::UnknownVariant { field, .. } => *field,
            Self::InvalidEmail => "email",
            Self::PasswordTooShort { .. } => "password",
            Self::CaptchaMismatch => "captcha",
            Self::ServiceNotSelected => "service",
            Self::IncompleteAssessment { .. } => "answers",
        }
    }
}

/// Rejects blank (empty or whitespace-only) values.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required { field })
    } else {
        Ok(())
    }
}

/// Every error found on a form, reported together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<ValidationError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The first error recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field() == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

impl From<ValidationError> for FieldErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

//=========================================================================================
// Sign-in
//=========================================================================================

/// The sign-in form as submitted. The captcha strings come from the external
/// captcha widget; only their equality is checked here.
#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
    pub captcha_expected: String,
    pub captcha_entered: String,
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Validates the sign-in form, collecting every failing field.
pub fn validate_sign_in(form: &SignInForm) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if form.email.is_empty() {
        errors.push(ValidationError::Required { field: "email" });
    } else if !is_valid_email(&form.email) {
        errors.push(ValidationError::InvalidEmail);
    }

    if form.password.is_empty() {
        errors.push(ValidationError::Required { field: "password" });
    } else if form.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }

    if form.captcha_entered != form.captcha_expected {
        errors.push(ValidationError::CaptchaMismatch);
    }

    errors.into_result(())
}

//=========================================================================================
// Password strength meter
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    pub fn label(self) -> &'static str {
        match self {
            Self::Weak => "Weak",
            Self::Medium => "Medium",
            Self::Strong => "Strong",
        }
    }
}

/// Rates a password for the strength meter. `None` for an empty password.
pub fn password_strength(password: &str) -> Option<PasswordStrength> {
    if password.is_empty() {
        return None;
    }

    let len = password.chars().count();
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());

    let strength = if len < MIN_PASSWORD_LEN {
        PasswordStrength::Weak
    } else if has_letter && has_digit && !has_symbol {
        PasswordStrength::Medium
    } else if len >= 8 && has_letter && has_digit && has_symbol && has_upper {
        PasswordStrength::Strong
    } else {
        PasswordStrength::Medium
    };
    Some(strength)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn form(email: &str, password: &str) -> SignInForm {
        SignInForm {
            email: email.to_string(),
            password: password.to_string(),
            captcha_expected: "aB3xY9".to_string(),
            captcha_entered: "aB3xY9".to_string(),
        }
    }

    #[test]
    fn well_formed_credentials_pass() {
        assert_eq!(validate_sign_in(&form("sam@uni.edu", "secret1")), Ok(()));
    }

    #[test]
    fn every_failing_field_is_reported() {
        let mut bad = form("not-an-email", "123");
        bad.captcha_entered = "nope".to_string();

        let errors = validate_sign_in(&bad).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_matches!(errors.get("email"), Some(ValidationError::InvalidEmail));
        assert_matches!(
            errors.get("password"),
            Some(ValidationError::PasswordTooShort { min: 6 })
        );
        assert_matches!(errors.get("captcha"), Some(ValidationError::CaptchaMismatch));
    }

    #[test]
    fn empty_fields_are_required() {
        let errors = validate_sign_in(&form("", "")).unwrap_err();
        assert_matches!(
            errors.get("email"),
            Some(ValidationError::Required { field: "email" })
        );
        assert_matches!(
            errors.get("password"),
            Some(ValidationError::Required { field: "password" })
        );
    }

    #[test]
    fn require_rejects_whitespace() {
        assert_matches!(require("content", "   \n"), Err(ValidationError::Required { .. }));
        assert!(require("content", " hi ").is_ok());
    }

    #[test]
    fn strength_meter_levels() {
        assert_eq!(password_strength(""), None);
        assert_eq!(password_strength("ab1"), Some(PasswordStrength::Weak));
        assert_eq!(password_strength("abc123"), Some(PasswordStrength::Medium));
        assert_eq!(password_strength("Abc123!x"), Some(PasswordStrength::Strong));
        // Symbol but no uppercase falls back to medium.
        assert_eq!(password_strength("abc123!x"), Some(PasswordStrength::Medium));
    }
}
