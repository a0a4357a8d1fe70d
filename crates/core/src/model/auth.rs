use thiserror::Error;

/// Input problems caught before any request is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Name must be between {min} and {max} characters")]
    NameLength { min: usize, max: usize },

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Please enter a valid email address")]
    InvalidEmail,
}

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;
pub const PASSWORD_MIN_CHARS: usize = 6;

/// Raw login form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Login input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns `ValidationError::MissingFields` if either field is blank.
    pub fn validate(self) -> Result<Credentials, ValidationError> {
        let email = self.email.trim().to_owned();
        if email.is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        Ok(Credentials {
            email,
            password: self.password,
        })
    }
}

/// Raw registration form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Registration input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegistrationForm {
    /// Checks run in the order the user sees them: presence, confirmation,
    /// then the backend's field constraints.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn validate(self) -> Result<Registration, ValidationError> {
        let name = self.name.trim().to_owned();
        let email = self.email.trim().to_owned();
        if name.is_empty()
            || email.is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(ValidationError::MissingFields);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        let name_len = name.chars().count();
        if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name_len) {
            return Err(ValidationError::NameLength {
                min: NAME_MIN_CHARS,
                max: NAME_MAX_CHARS,
            });
        }
        if self.password.chars().count() < PASSWORD_MIN_CHARS {
            return Err(ValidationError::PasswordTooShort {
                min: PASSWORD_MIN_CHARS,
            });
        }
        if !looks_like_email(&email) {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(Registration {
            name,
            email,
            password: self.password,
        })
    }
}

fn looks_like_email(value: &str) -> bool {
    value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> RegistrationForm {
        RegistrationForm {
            name: "Carlos".into(),
            email: "carlos@example.com".into(),
            password: "hunter22".into(),
            confirm_password: "hunter22".into(),
        }
    }

    #[test]
    fn login_requires_both_fields() {
        let form = LoginForm {
            email: "  ".into(),
            password: "x".into(),
        };
        assert_eq!(form.validate().unwrap_err(), ValidationError::MissingFields);
    }

    #[test]
    fn login_trims_email() {
        let creds = LoginForm {
            email: " a@b.co ".into(),
            password: "pw".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(creds.email, "a@b.co");
    }

    #[test]
    fn registration_checks_confirmation_before_lengths() {
        let form = RegistrationForm {
            password: "abc".into(),
            confirm_password: "abd".into(),
            ..registration()
        };
        assert_eq!(form.validate().unwrap_err(), ValidationError::PasswordMismatch);
    }

    #[test]
    fn registration_enforces_backend_constraints() {
        let short_name = RegistrationForm {
            name: "C".into(),
            ..registration()
        };
        assert!(matches!(
            short_name.validate().unwrap_err(),
            ValidationError::NameLength { .. }
        ));

        let short_password = RegistrationForm {
            password: "abc".into(),
            confirm_password: "abc".into(),
            ..registration()
        };
        assert_eq!(
            short_password.validate().unwrap_err(),
            ValidationError::PasswordTooShort { min: 6 }
        );

        let bad_email = RegistrationForm {
            email: "carlos.example.com".into(),
            ..registration()
        };
        assert_eq!(bad_email.validate().unwrap_err(), ValidationError::InvalidEmail);

        let no_domain = RegistrationForm {
            email: "carlos@".into(),
            ..registration()
        };
        assert_eq!(no_domain.validate().unwrap_err(), ValidationError::InvalidEmail);
    }

    #[test]
    fn email_needs_text_on_both_sides_of_the_at() {
        assert!(looks_like_email("a@localhost"));
        assert!(looks_like_email("carlos@example.com"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("carlos"));
    }

    #[test]
    fn registration_accepts_valid_input() {
        let reg = registration().validate().unwrap();
        assert_eq!(reg.name, "Carlos");
    }
}
