//! Sign-in input validation.
//!
//! Pure functions, safe to call on every keystroke. The identifier field accepts
//! a username, an email address or a phone number; its kind is recomputed from
//! the content on every call and never stored.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const USERNAME_MIN_LEN: usize = 5;
pub const USERNAME_MAX_LEN: usize = 30;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MAX_LEN: usize = 30;
pub const PHONE_MIN_DIGITS: usize = 10;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .unwrap_or_else(|e| unreachable!("email pattern is a valid regex: {e}"))
});

/// Unicode decimal digits plus `+` and `-`: input that routes to the phone rule.
static PHONE_CHARS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{Nd}+\-]+$")
        .unwrap_or_else(|e| unreachable!("phone pattern is a valid regex: {e}"))
});

static USERNAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._]+$")
        .unwrap_or_else(|e| unreachable!("username pattern is a valid regex: {e}"))
});

/// Why a field failed validation.
///
/// Closed set; every variant is displayable as a field error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationError {
    #[error("this field is required")]
    FieldRequired,
    #[error("enter a valid email address")]
    InvalidEmail,
    #[error("enter a valid phone number")]
    InvalidPhone,
    #[error("username must be at least 5 characters")]
    UsernameTooShort,
    #[error("username must be at most 30 characters")]
    UsernameTooLong,
    #[error("username may only contain letters, digits, '.' and '_'")]
    UsernameInvalidChars,
    #[error("password is required")]
    PasswordRequired,
    #[error("password must be at least 6 characters")]
    PasswordTooShort,
    #[error("password must be at most 30 characters")]
    PasswordTooLong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationOutcome {
    Valid,
    Invalid(ValidationError),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The rejection reason, `None` when valid.
    pub fn error(&self) -> Option<ValidationError> {
        match self {
            Self::Valid => None,
            Self::Invalid(reason) => Some(*reason),
        }
    }
}

impl From<ValidationOutcome> for Result<(), ValidationError> {
    fn from(outcome: ValidationOutcome) -> Self {
        match outcome {
            ValidationOutcome::Valid => Ok(()),
            ValidationOutcome::Invalid(reason) => Err(reason),
        }
    }
}

/// Which rule an identifier is routed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    Email,
    Phone,
    Username,
}

/// Route a raw identifier to the rule that validates it.
///
/// Returns `None` for blank input. Order matters: anything containing `@` is an
/// email even when it would also pass as a phone number or username.
pub fn classify_identifier(text: &str) -> Option<IdentifierKind> {
    if is_blank(text) {
        None
    } else if text.contains('@') {
        Some(IdentifierKind::Email)
    } else if PHONE_CHARS_PATTERN.is_match(text) {
        Some(IdentifierKind::Phone)
    } else {
        Some(IdentifierKind::Username)
    }
}

pub fn validate_identifier(text: &str) -> ValidationOutcome {
    match classify_identifier(text) {
        None => ValidationOutcome::Invalid(ValidationError::FieldRequired),
        Some(IdentifierKind::Email) => validate_email(text),
        Some(IdentifierKind::Phone) => validate_phone(text),
        Some(IdentifierKind::Username) => validate_username(text),
    }
}

pub fn validate_password(text: &str) -> ValidationOutcome {
    let len = text_len(text);
    if text.is_empty() {
        ValidationOutcome::Invalid(ValidationError::PasswordRequired)
    } else if len < PASSWORD_MIN_LEN {
        ValidationOutcome::Invalid(ValidationError::PasswordTooShort)
    } else if len > PASSWORD_MAX_LEN {
        ValidationOutcome::Invalid(ValidationError::PasswordTooLong)
    } else {
        ValidationOutcome::Valid
    }
}

/// Length in UTF-16 code units, the unit the client platforms count in.
fn text_len(text: &str) -> usize {
    text.encode_utf16().count()
}

fn is_blank(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

fn validate_email(email: &str) -> ValidationOutcome {
    if EMAIL_PATTERN.is_match(email) {
        ValidationOutcome::Valid
    } else {
        ValidationOutcome::Invalid(ValidationError::InvalidEmail)
    }
}

fn validate_phone(phone: &str) -> ValidationOutcome {
    let digits = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .count();
    if digits < PHONE_MIN_DIGITS {
        ValidationOutcome::Invalid(ValidationError::InvalidPhone)
    } else {
        ValidationOutcome::Valid
    }
}

fn validate_username(username: &str) -> ValidationOutcome {
    let len = text_len(username);
    if len < USERNAME_MIN_LEN {
        ValidationOutcome::Invalid(ValidationError::UsernameTooShort)
    } else if len > USERNAME_MAX_LEN {
        ValidationOutcome::Invalid(ValidationError::UsernameTooLong)
    } else if !USERNAME_PATTERN.is_match(username) {
        ValidationOutcome::Invalid(ValidationError::UsernameInvalidChars)
    } else {
        ValidationOutcome::Valid
    }
}
