// ABOUTME: Input validation shared by storage layers and request handlers
// ABOUTME: Name, email and password rules for user-owned records

use thiserror::Error;

/// Longest accepted name or title, in characters
pub const MAX_NAME_LENGTH: usize = 255;

/// Shortest accepted password, in characters
pub const MIN_PASSWORD_LENGTH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ValidationError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Trim a name and check it is non-empty and within `MAX_NAME_LENGTH`
pub fn validate_name(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(trimmed.to_string())
}

/// Lower-case the domain part of an email address, keeping the local part as given
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Normalize an email address and check it has a local part and a dotted domain
pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let normalized = normalize_email(email);

    if normalized.is_empty() {
        return Err(ValidationError::Empty { field: "email" });
    }
    if normalized.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email",
            max: MAX_NAME_LENGTH,
        });
    }

    let (local, domain) = normalized
        .rsplit_once('@')
        .ok_or_else(|| ValidationError::invalid("email", "missing '@'"))?;

    if local.is_empty() || local.contains(char::is_whitespace) {
        return Err(ValidationError::invalid("email", "bad local part"));
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(ValidationError::invalid("email", "bad domain"));
    }

    Ok(normalized)
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "password",
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_trims() {
        assert_eq!(validate_name("name", "  Greek ").unwrap(), "Greek");
    }

    #[test]
    fn test_validate_name_rejects_blank() {
        assert_eq!(
            validate_name("name", "   "),
            Err(ValidationError::Empty { field: "name" })
        );
    }

    #[test]
    fn test_validate_name_rejects_overlong() {
        let long = "a".repeat(MAX_NAME_LENGTH + 1);
        assert!(matches!(
            validate_name("title", &long),
            Err(ValidationError::TooLong { field: "title", .. })
        ));
        assert!(validate_name("title", &"a".repeat(MAX_NAME_LENGTH)).is_ok());
    }

    #[test]
    fn test_normalize_email_lowercases_domain_only() {
        assert_eq!(normalize_email("Test@EXAMPLE.com"), "Test@example.com");
        assert_eq!(normalize_email(" user@Example.COM "), "user@example.com");
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@localhost").is_err());
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("pw").is_err());
        assert!(validate_password("testpass123").is_ok());
    }
}
