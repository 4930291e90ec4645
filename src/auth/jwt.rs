use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;

/// Session token claims; `sub` is the user id
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256 session tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issue a token for a user
    pub fn issue(&self, user_id: Uuid) -> Result<String, ApiError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| ApiError::Internal("Token lifetime out of range".to_string()))?;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Validate a token and return the user id it was issued for
    pub fn verify(&self, token: &str) -> Result<Uuid, ApiError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::warn!("JWT validation failed: {}", e);
            ApiError::Unauthorized(format!("Invalid token: {}", e))
        })?;

        Uuid::parse_str(&token_data.claims.sub)
            .map_err(|_| ApiError::Unauthorized("Invalid subject in token".to_string()))
    }
}

/// Extract JWT token from Authorization header
/// Expected format: "Bearer <token>"
pub fn extract_jwt_from_header(auth_header: Option<&str>) -> Result<&str, ApiError> {
    let auth_value = auth_header.ok_or_else(|| {
        ApiError::Unauthorized("Missing Authorization header".to_string())
    })?;

    // Strip "Bearer " prefix
    auth_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization header format, expected 'Bearer <token>'".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_jwt_from_header_valid() {
        let header = "Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.test.token";
        let result = extract_jwt_from_header(Some(header));
        assert!(result.is_ok());
        assert_eq!(
            result.unwrap(),
            "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.test.token"
        );
    }

    #[test]
    fn test_extract_jwt_from_header_missing() {
        let result = extract_jwt_from_header(None);
        match result {
            Err(ApiError::Unauthorized(msg)) => {
                assert!(msg.contains("Missing Authorization header"));
            }
            _ => panic!("Expected Unauthorized error"),
        }
    }

    #[test]
    fn test_extract_jwt_from_header_invalid_format() {
        let result = extract_jwt_from_header(Some("Token abc"));
        match result {
            Err(ApiError::Unauthorized(msg)) => {
                assert!(msg.contains("Invalid Authorization header format"));
            }
            _ => panic!("Expected Unauthorized error"),
        }
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let tokens = TokenService::new("test-secret", Duration::hours(1));
        let user_id = Uuid::new_v4();

        let token = tokens.issue(user_id).unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn test_verify_rejects_other_secret() {
        let token = TokenService::new("secret-a", Duration::hours(1)).issue(Uuid::new_v4()).unwrap();
        let result = TokenService::new("secret-b", Duration::hours(1)).verify(&token);
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        // Default validation allows 60s of leeway
        let tokens = TokenService::new("test-secret", Duration::hours(-1));
        let token = tokens.issue(Uuid::new_v4()).unwrap();
        assert!(matches!(tokens.verify(&token), Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let tokens = TokenService::new("test-secret", Duration::hours(1));
        assert!(tokens.verify("not-a-jwt").is_err());
    }

    #[test]
    fn test_issue_with_unrepresentable_expiry_fails() {
        let tokens = TokenService::new("test-secret", Duration::MAX);
        assert!(matches!(tokens.issue(Uuid::new_v4()), Err(ApiError::Internal(_))));
    }
}
