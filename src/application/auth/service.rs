//! Core business logic for the authentication system.
//!
//! Orchestrates user creation (hash + persist), token issuance
//! (verify credentials, collect roles, mint token) and token parsing.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use super::AuthError;
use crate::domain::{CreateUserDto, UserInfo, UserRepositoryInterface};
use crate::infrastructure::crypto::jwt::{create_token, verify_token, JwtConfig, TokenError};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

/// Auth service.
///
/// Holds the repository, the signing configuration and the bcrypt cost —
/// all injected at construction, immutable afterwards. Every operation is
/// synchronous single-attempt: no retries, errors are terminal for the
/// current request.
pub struct AuthService {
    repo: Arc<dyn UserRepositoryInterface>,
    jwt_config: JwtConfig,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        repo: Arc<dyn UserRepositoryInterface>,
        jwt_config: JwtConfig,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            repo,
            jwt_config,
            bcrypt_cost,
        }
    }

    pub fn token_ttl_hours(&self) -> i64 {
        self.jwt_config.token_ttl_hours
    }

    /// Register a new user.
    ///
    /// Hashes the password with the configured cost and persists the user
    /// with the deduplicated role set. Uniqueness of login/email is the
    /// repository's concern; its conflict error propagates unchanged.
    pub async fn create_user(
        &self,
        login: &str,
        email: &str,
        password: &str,
        roles: &[String],
    ) -> Result<(), AuthError> {
        let password_hash = hash_password(password, self.bcrypt_cost).map_err(AuthError::Hash)?;

        let roles: HashSet<String> = roles.iter().cloned().collect();

        let dto = CreateUserDto {
            login: login.to_string(),
            // New accounts start with the login as display name.
            full_name: login.to_string(),
            email: email.to_string(),
            password_hash,
            roles,
        };

        self.repo.create_user(&dto).await?;

        info!(login, "new user registered");
        Ok(())
    }

    /// Verify credentials and mint a token carrying the user's identity
    /// and role set.
    ///
    /// Unknown email and wrong password both come back as
    /// [`AuthError::InvalidCredentials`].
    pub async fn create_token(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let user = self.repo.get_user_by_email(email).await?;

        let Some(user) = user else {
            debug!(email, "login attempt for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            debug!(user_id = user.id, "login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let roles = self.repo.get_roles(user.id).await?;

        let info = UserInfo {
            id: user.id,
            roles,
        };

        create_token(info, &self.jwt_config).map_err(AuthError::Signing)
    }

    /// Verify a token's signature and expiry and extract the identity.
    ///
    /// Expiry stays distinguishable; every other decode failure collapses
    /// into [`AuthError::InvalidToken`].
    pub fn parse_token(&self, token: &str) -> Result<UserInfo, AuthError> {
        match verify_token(token, &self.jwt_config) {
            Ok(claims) => Ok(claims.user),
            Err(TokenError::Expired) => Err(AuthError::ExpiredToken),
            Err(_) => Err(AuthError::InvalidToken),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    use super::*;
    use crate::domain::user::mock::InMemoryUsers;
    use crate::domain::DomainError;
    use crate::infrastructure::crypto::jwt::Claims;

    // Minimum bcrypt cost; keeps the tests fast.
    const COST: u32 = 4;

    fn test_service() -> AuthService {
        AuthService::new(
            Arc::new(InMemoryUsers::new()),
            JwtConfig {
                secret: "testSigningKey".to_string(),
                token_ttl_hours: 3,
                issuer: "job-board".to_string(),
            },
            COST,
        )
    }

    #[tokio::test]
    async fn test_create_user_hashes_password_and_dedups_roles() {
        let repo = Arc::new(InMemoryUsers::new());
        let auth = AuthService::new(
            Arc::clone(&repo) as Arc<dyn UserRepositoryInterface>,
            JwtConfig {
                secret: "testSigningKey".to_string(),
                token_ttl_hours: 3,
                issuer: "job-board".to_string(),
            },
            COST,
        );

        let roles = vec![
            "mod".to_string(),
            "mod".to_string(),
            "applicant".to_string(),
        ];
        auth.create_user("login", "email@gmail.com", "password", &roles)
            .await
            .unwrap();

        let stored = repo
            .get_user_by_email("email@gmail.com")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password_hash, "password");
        assert!(verify_password("password", &stored.password_hash).unwrap());
        assert_eq!(stored.full_name, "login");

        let roles = repo.get_roles(stored.id).await.unwrap();
        assert_eq!(roles.len(), 2);
        assert!(roles.contains("mod") && roles.contains("applicant"));
    }

    #[tokio::test]
    async fn test_create_user_duplicate_propagates_conflict() {
        let auth = test_service();
        auth.create_user("login", "email@gmail.com", "password", &[])
            .await
            .unwrap();

        let err = auth
            .create_user("login", "other@gmail.com", "password", &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::Repository(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_register_login_round_trip() {
        let auth = test_service();

        auth.create_user("root", "root@root.com", "root1", &["mod".to_string()])
            .await
            .unwrap();

        let token = auth.create_token("root@root.com", "root1").await.unwrap();

        let info = auth.parse_token(&token).unwrap();
        assert!(info.roles.contains("mod"));
        assert_eq!(info.id, 1);
    }

    #[tokio::test]
    async fn test_create_token_wrong_password() {
        let auth = test_service();
        auth.create_user("root", "root@root.com", "root1", &["mod".to_string()])
            .await
            .unwrap();

        let err = auth
            .create_token("root@root.com", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_create_token_unknown_email_is_same_failure() {
        let auth = test_service();

        let err = auth
            .create_token("nobody@root.com", "root1")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_parse_empty_token() {
        let auth = test_service();
        let err = auth.parse_token("").unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_parse_expired_token() {
        let auth = test_service();

        let claims = Claims {
            user: UserInfo {
                id: 1,
                roles: HashSet::from(["mod".to_string()]),
            },
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
            iat: (Utc::now() - Duration::hours(5)).timestamp(),
            iss: "job-board".to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("testSigningKey".as_bytes()),
        )
        .unwrap();

        let err = auth.parse_token(&token).unwrap_err();
        assert!(matches!(err, AuthError::ExpiredToken));
    }

    #[tokio::test]
    async fn test_parse_token_signed_with_other_key() {
        let auth = test_service();
        let other = AuthService::new(
            Arc::new(InMemoryUsers::new()),
            JwtConfig {
                secret: "anotherKey".to_string(),
                token_ttl_hours: 3,
                issuer: "job-board".to_string(),
            },
            COST,
        );
        other
            .create_user("root", "root@root.com", "root1", &[])
            .await
            .unwrap();
        let token = other.create_token("root@root.com", "root1").await.unwrap();

        let err = auth.parse_token(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }
}
