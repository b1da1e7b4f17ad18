//! Jotter Auth Library
//!
//! Credential hashing (Argon2id) and stateless bearer tokens (HS256 JWT).
//! Nothing here touches storage; the signing secret arrives through an
//! [`AuthConfig`] built once at startup.

pub mod password;
pub mod token;

use std::fmt;

pub use password::{hash_password, verify_password};
pub use token::{issue_token, issue_token_at, validate_token};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("token signing failed: {0}")]
    Signing(String),
    #[error("missing, invalid or expired token")]
    Unauthorized,
}

/// Immutable token configuration. Cloned into request state, never mutated.
#[derive(Clone)]
pub struct AuthConfig {
    jwt_secret: String,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
        }
    }

    pub(crate) fn secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}
