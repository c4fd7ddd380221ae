//! Authentication Service
//!
//! Validates bearer tokens issued by the account service and resolves them to
//! a user identity. Token issuance and password handling live elsewhere.

use jsonwebtoken::{decode, errors::ErrorKind, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config::JwtSettings;
use crate::domain::UserIdentity;
use crate::shared::error::AppError;

/// Token validation capability
#[cfg_attr(test, mockall::automock)]
pub trait Authenticator: Send + Sync {
    /// Resolve a token to the identity it was issued for.
    fn authenticate(&self, token: &str) -> Result<UserIdentity, AuthError>;
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub id: i64,
    /// User login
    pub login: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Authentication errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Missing token")]
    Missing,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Malformed token")]
    Malformed,
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Unauthorized(e.to_string())
    }
}

/// HS256 JWT authenticator
pub struct JwtAuthenticator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAuthenticator {
    pub fn new(settings: &JwtSettings) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation: Validation::default(),
        }
    }
}

impl Authenticator for JwtAuthenticator {
    fn authenticate(&self, token: &str) -> Result<UserIdentity, AuthError> {
        if token.is_empty() {
            return Err(AuthError::Missing);
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => AuthError::Malformed,
                _ => AuthError::Invalid,
            }
        })?;

        if data.claims.login.is_empty() {
            return Err(AuthError::Malformed);
        }

        Ok(UserIdentity::new(data.claims.id, data.claims.login))
    }
}
