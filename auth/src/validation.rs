//! Caller-side form validation.
//!
//! Runs before any action is sent; a rejected form leaves the container
//! untouched.

use crate::constants::MIN_PASSWORD_LEN;
use crate::error::{AuthError, Result};

/// Reported when a required field is empty.
pub const MISSING_FIELDS: &str = "Please fill in all fields";
/// Reported when password and confirmation differ.
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";
/// Reported when the password is below [`MIN_PASSWORD_LEN`].
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
/// Reported when a confirmation is attempted without a token.
pub const MISSING_TOKEN: &str = "Verification token is required";

/// Sign-in form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInForm {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

impl SignInForm {
    /// Create a form.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Check the form.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] if either field is empty.
    pub fn validate(&self) -> Result<()> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(AuthError::Validation(MISSING_FIELDS.to_string()));
        }
        Ok(())
    }
}

/// Sign-up form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
    /// Password typed a second time.
    pub confirm_password: String,
}

impl SignUpForm {
    /// Create a form.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    /// Check the form. Rules apply in order; the first failure is reported.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] if a field is empty, the passwords
    /// differ, or the password is too short.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty()
            || self.email.is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(AuthError::Validation(MISSING_FIELDS.to_string()));
        }
        if self.password != self.confirm_password {
            return Err(AuthError::Validation(PASSWORD_MISMATCH.to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(PASSWORD_TOO_SHORT.to_string()));
        }
        Ok(())
    }
}

/// Check a verification token.
///
/// # Errors
///
/// Returns [`AuthError::Validation`] if the token is blank.
pub fn validate_token(token: &str) -> Result<()> {
    if token.trim().is_empty() {
        return Err(AuthError::Validation(MISSING_TOKEN.to_string()));
    }
    Ok(())
}
