//! Sign-in form state.
//!
//! `is_form_valid` is derived: it is recomputed from both error fields on every
//! transition and cannot be set on its own.

use super::secret::SecretString;
use super::validation::{validate_identifier, validate_password, ValidationError};

/// Saved-state slot holding the identifier text.
pub const USERNAME_SLOT_KEY: &str = "username";
/// Saved-state slot holding the password text.
pub const PASSWORD_SLOT_KEY: &str = "password";

/// The two inputs of the sign-in form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Identifier,
    Password,
}

impl FormField {
    /// Key of the restorable slot this field is checkpointed into.
    pub fn slot_key(self) -> &'static str {
        match self {
            Self::Identifier => USERNAME_SLOT_KEY,
            Self::Password => PASSWORD_SLOT_KEY,
        }
    }
}

/// Snapshot of the sign-in form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    identifier: String,
    password: SecretString,
    identifier_error: Option<ValidationError>,
    password_error: Option<ValidationError>,
    is_form_valid: bool,
}

impl FormState {
    /// Build a state from raw input, validating both fields.
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        let identifier = identifier.into();
        let password = SecretString::new(password);
        let identifier_error = validate_identifier(&identifier).error();
        let password_error = validate_password(password.expose()).error();
        Self {
            identifier,
            password,
            identifier_error,
            password_error,
            is_form_valid: identifier_error.is_none() && password_error.is_none(),
        }
    }

    /// State after the identifier text changed. The text is stored verbatim.
    pub fn with_identifier(mut self, text: impl Into<String>) -> Self {
        self.identifier = text.into();
        self.identifier_error = validate_identifier(&self.identifier).error();
        self.recompute_validity();
        self
    }

    /// State after the password text changed.
    pub fn with_password(mut self, text: impl Into<String>) -> Self {
        self.password = SecretString::new(text);
        self.password_error = validate_password(self.password.expose()).error();
        self.recompute_validity();
        self
    }

    /// Re-run both validators against the stored text.
    pub fn revalidated(&self) -> Self {
        Self::new(self.identifier.clone(), self.password.expose())
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    pub fn identifier_error(&self) -> Option<ValidationError> {
        self.identifier_error
    }

    pub fn password_error(&self) -> Option<ValidationError> {
        self.password_error
    }

    pub fn is_form_valid(&self) -> bool {
        self.is_form_valid
    }

    pub fn error_for(&self, field: FormField) -> Option<ValidationError> {
        match field {
            FormField::Identifier => self.identifier_error,
            FormField::Password => self.password_error,
        }
    }

    fn recompute_validity(&mut self) {
        self.is_form_valid = self.identifier_error.is_none() && self.password_error.is_none();
    }
}

impl Default for FormState {
    /// Empty form. Both fields start out failing their "required" rule.
    fn default() -> Self {
        Self::new(String::new(), String::new())
    }
}
