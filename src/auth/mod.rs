pub mod jwt;
pub mod password;
pub mod validation;

pub use jwt::{extract_jwt_from_header, TokenService};
pub use password::PasswordHasher;
pub use validation::{validate_login, validate_registration, FieldError, LoginRequest, RegistrationRequest};
