use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::crypto::TokenError;

/// Errors surfaced by the auth service.
///
/// The HTTP boundary needs expired kept apart from every other token
/// failure; beyond that, token problems are deliberately not subdivided.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to generate password hash: {0}")]
    Hash(#[source] bcrypt::BcryptError),

    /// Unknown email and wrong password collapse into this one variant so
    /// callers cannot probe which emails are registered.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token expired")]
    ExpiredToken,

    #[error("token has invalid format or couldn't handle it")]
    InvalidToken,

    #[error("failed to sign claims: {0}")]
    Signing(#[source] TokenError),

    #[error(transparent)]
    Repository(#[from] DomainError),
}
