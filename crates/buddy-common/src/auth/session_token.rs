//! Session tokens
//!
//! Signed bearer tokens carrying the authenticated screen name, built on the
//! `jsonwebtoken` crate. The login flow that hands these out is external; the
//! presence core only verifies them.

use buddy_core::ScreenName;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (screen name)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Get the authenticated screen name
    ///
    /// # Errors
    /// Returns an error if the subject is not a valid screen name
    pub fn screen_name(&self) -> Result<ScreenName, AppError> {
        ScreenName::parse(&self.sub).map_err(|_| AppError::InvalidToken)
    }
}

/// Issues and verifies session tokens
#[derive(Clone)]
pub struct SessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry: i64,
}

impl SessionTokens {
    /// Create a token service with the given secret and expiry (seconds)
    #[must_use]
    pub fn new(secret: &str, token_expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expiry,
        }
    }

    /// Issue a token for a screen name with the configured expiry
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue(&self, screen_name: &ScreenName) -> Result<String, AppError> {
        self.issue_with_expiry(screen_name, self.token_expiry)
    }

    /// Issue a token expiring `expiry_secs` from now (negative for already expired)
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue_with_expiry(
        &self,
        screen_name: &ScreenName,
        expiry_secs: i64,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: screen_name.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(expiry_secs)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode session token: {e}")))
    }

    /// Decode and validate a token
    ///
    /// # Errors
    /// Returns an error if the token is malformed, tampered with, or expired
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        let validation = Validation::default();

        let token_data =
            decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                    _ => AppError::InvalidToken,
                }
            })?;

        Ok(token_data.claims)
    }

    /// Verify a token and return the screen name it names
    ///
    /// # Errors
    /// Returns an error if the token is invalid or names an invalid screen name
    pub fn authenticate(&self, token: &str) -> Result<ScreenName, AppError> {
        self.verify(token)?.screen_name()
    }
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("token_expiry", &self.token_expiry)
            .finish_non_exhaustive()
    }
}
