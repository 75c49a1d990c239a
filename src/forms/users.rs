use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// Minimum number of characters in a password.
const PASSWORD_MIN_LEN: usize = 8;
const PASSWORD_MIN_LEN_VALIDATOR: u64 = PASSWORD_MIN_LEN as u64;

/// Maximum allowed length for user names and e-mail addresses.
const IDENTIFIER_MAX_LEN: u64 = 256;
/// Maximum allowed length for a full name.
const FULL_NAME_MAX_LEN: u64 = 100;

/// Result type returned by the user form helpers.
pub type UserFormResult<T> = Result<T, UserFormError>;

/// Errors that can occur while processing account forms.
#[derive(Debug, Error)]
pub enum UserFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("password and confirm password do not match")]
    PasswordMismatch,
    #[error("password must contain at least one digit, one lowercase and one uppercase letter")]
    WeakPassword,
    #[error("user name cannot be empty")]
    EmptyUserName,
}

/// JSON body accepted by the registration endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    #[validate(email, length(max = IDENTIFIER_MAX_LEN))]
    pub email: String,
    #[serde(alias = "username")]
    #[validate(length(min = 1, max = IDENTIFIER_MAX_LEN))]
    pub user_name: String,
    /// Full name of the account holder.
    #[serde(alias = "fullName")]
    #[validate(length(min = 1, max = FULL_NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(min = PASSWORD_MIN_LEN_VALIDATOR))]
    pub password: String,
    pub confirm_password: String,
}

/// Sanitized registration data; the password is still in clear text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub user_name: String,
    pub full_name: String,
    pub password: String,
}

impl RegisterForm {
    /// Validate the form and check the password rules.
    pub fn into_registration(self) -> UserFormResult<Registration> {
        self.validate()?;

        if self.password != self.confirm_password {
            return Err(UserFormError::PasswordMismatch);
        }

        if !is_strong_password(&self.password) {
            return Err(UserFormError::WeakPassword);
        }

        let user_name = self.user_name.trim().to_string();
        if user_name.is_empty() {
            return Err(UserFormError::EmptyUserName);
        }

        Ok(Registration {
            email: self.email.trim().to_lowercase(),
            user_name,
            full_name: self.name.trim().to_string(),
            password: self.password,
        })
    }
}

/// JSON body accepted by the login endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= PASSWORD_MIN_LEN
        && password.chars().any(|ch| ch.is_ascii_digit())
        && password.chars().any(char::is_lowercase)
        && password.chars().any(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn register_form(password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            email: "Jane@Example.com".to_string(),
            user_name: " jane ".to_string(),
            name: "Jane Doe".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn registration_normalizes_identity() {
        let registration = register_form("Secret123", "Secret123")
            .into_registration()
            .expect("valid registration");

        assert_eq!(registration.email, "jane@example.com");
        assert_eq!(registration.user_name, "jane");
        assert_eq!(registration.full_name, "Jane Doe");
    }

    #[test]
    fn registration_rejects_mismatched_confirmation() {
        let form = register_form("Secret123", "Secret124");

        assert!(matches!(
            form.into_registration(),
            Err(UserFormError::PasswordMismatch)
        ));
    }

    #[test]
    fn registration_requires_mixed_password() {
        let form = register_form("secret123", "secret123");

        assert!(matches!(
            form.into_registration(),
            Err(UserFormError::WeakPassword)
        ));
    }

    #[test]
    fn register_form_accepts_camel_case_and_aliases() {
        let form: RegisterForm = serde_json::from_value(json!({
            "email": "jane@example.com",
            "username": "jane",
            "fullName": "Jane Doe",
            "password": "Secret123",
            "confirmPassword": "Secret123"
        }))
        .expect("form should deserialize");

        assert_eq!(form.user_name, "jane");
        assert_eq!(form.name, "Jane Doe");
    }
}
