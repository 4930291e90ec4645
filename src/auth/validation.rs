use serde::{Deserialize, Serialize};

/// One failed field check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

// Missing fields deserialize as empty strings so they fail the length checks
// with a field error instead of a body rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub const MIN_NAME_LENGTH: usize = 2;
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimal address check: one `@`, a non-empty local part and a dotted domain
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

pub fn validate_name(name: &str) -> Option<FieldError> {
    (name.trim().chars().count() < MIN_NAME_LENGTH)
        .then(|| FieldError::new("name", "Name must be at least 2 characters"))
}

fn validate_email(email: &str) -> Option<FieldError> {
    (!is_valid_email(email)).then(|| FieldError::new("email", "Invalid email address"))
}

fn validate_password(password: &str) -> Option<FieldError> {
    (password.chars().count() < MIN_PASSWORD_LENGTH)
        .then(|| FieldError::new("password", "Password must be at least 6 characters"))
}

fn collect(errors: impl IntoIterator<Item = Option<FieldError>>) -> Result<(), Vec<FieldError>> {
    let errors: Vec<FieldError> = errors.into_iter().flatten().collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_registration(request: &RegistrationRequest) -> Result<(), Vec<FieldError>> {
    collect([
        validate_name(&request.name),
        validate_email(&request.email),
        validate_password(&request.password),
    ])
}

pub fn validate_login(request: &LoginRequest) -> Result<(), Vec<FieldError>> {
    collect([
        validate_email(&request.email),
        validate_password(&request.password),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registration(name: &str, email: &str, password: &str) -> RegistrationRequest {
        RegistrationRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(validate_registration(&registration("Jo", "jo@example.com", "secret")).is_ok());
    }

    #[test]
    fn test_registration_reports_every_field() {
        let errors = validate_registration(&registration("J", "not-an-email", "12345")).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "password"]);
        assert_eq!(errors[2].message, "Password must be at least 6 characters");
    }

    #[test]
    fn test_login_validation() {
        let ok = LoginRequest {
            email: "jo@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(validate_login(&ok).is_ok());

        let bad = LoginRequest {
            email: "jo@example".to_string(),
            password: "secret".to_string(),
        };
        assert_eq!(
            validate_login(&bad).unwrap_err(),
            vec![FieldError::new("email", "Invalid email address")]
        );
    }

    #[test]
    fn test_missing_fields_deserialize_empty() {
        let request: RegistrationRequest = serde_json::from_str(r#"{"name": "Jo"}"#).unwrap();
        let errors = validate_registration(&request).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@@example.com"));
        assert!(!is_valid_email("a@example."));
        assert!(!is_valid_email("a b@example.com"));
        assert!(!is_valid_email("plainaddress"));
    }
}
