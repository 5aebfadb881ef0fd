//! JWT token handling
//!
//! Encodes the identity projection into a signed, time-bound HS256 token
//! and decodes it back, keeping expiry distinguishable from every other
//! failure so callers can tell "log in again" apart from "bad token".

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::UserInfo;

/// JWT configuration
///
/// Constructed once at startup and injected; immutable afterwards.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token lifetime in hours
    pub token_ttl_hours: i64,
    /// Issuer claim
    pub issuer: String,
}

/// Errors that can occur while encoding or decoding a token
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    /// Structurally valid and correctly signed, but the payload does not
    /// have the expected claim shape.
    #[error("token claims invalid")]
    InvalidClaims,
    #[error("token has invalid format or signature")]
    Invalid,
    #[error("failed to sign claims: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// JWT claims: the identity fields flattened next to the registered
/// fields, so the wire form is a single flat JSON object
/// (`userId`, `roles`, `exp`, `iat`, `iss`).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    #[serde(flatten)]
    pub user: UserInfo,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl Claims {
    /// Create new claims for a user
    pub fn new(user: UserInfo, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.token_ttl_hours);

        Self {
            user,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Create a signed token carrying the given identity
pub fn create_token(user: UserInfo, config: &JwtConfig) -> Result<String, TokenError> {
    let claims = Claims::new(user, config);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(TokenError::Signing)
}

/// Verify and decode a token
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::Json(_) => TokenError::InvalidClaims,
        _ => TokenError::Invalid,
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "testSigningKey".to_string(),
            token_ttl_hours: 1,
            issuer: "test".to_string(),
        }
    }

    fn test_user() -> UserInfo {
        UserInfo {
            id: 1,
            roles: HashSet::from(["mod".to_string(), "applicant".to_string()]),
        }
    }

    #[test]
    fn test_create_and_verify_token() {
        let config = test_config();
        let token = create_token(test_user(), &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.user, test_user());
        assert_eq!(claims.iss, "test");
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_invalid_token() {
        let result = verify_token("invalid-token", &test_config());
        assert!(matches!(result, Err(TokenError::Invalid)));
    }

    #[test]
    fn test_tampered_token() {
        let config = test_config();
        let mut token = create_token(test_user(), &config).unwrap();
        token.replace_range(0..1, "/");

        let result = verify_token(&token, &config);
        assert!(matches!(result, Err(TokenError::Invalid)));
    }

    #[test]
    fn test_expired_token() {
        let config = test_config();
        let claims = Claims {
            user: test_user(),
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
            iat: (Utc::now() - Duration::hours(3)).timestamp(),
            iss: config.issuer.clone(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let result = verify_token(&token, &config);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_wrong_secret_is_invalid_not_expired() {
        let config = test_config();
        let other = JwtConfig {
            secret: "anotherKey".to_string(),
            ..test_config()
        };
        let token = create_token(test_user(), &other).unwrap();

        let result = verify_token(&token, &config);
        assert!(matches!(result, Err(TokenError::Invalid)));
    }

    #[test]
    fn test_unexpected_claim_shape() {
        let config = test_config();
        // Correctly signed, unexpired, but missing the identity fields.
        let payload = serde_json::json!({
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
            "iat": Utc::now().timestamp(),
            "iss": config.issuer,
        });
        let token = encode(
            &Header::default(),
            &payload,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let result = verify_token(&token, &config);
        assert!(matches!(result, Err(TokenError::InvalidClaims)));
    }

    #[test]
    fn test_roles_survive_round_trip_as_set() {
        let config = test_config();
        let user = UserInfo {
            id: 7,
            roles: HashSet::from(["mod".to_string()]),
        };
        let token = create_token(user, &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert!(claims.user.roles.contains("mod"));
        assert_eq!(claims.user.roles.len(), 1);
    }
}
