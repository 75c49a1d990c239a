use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::domain::auth::Claims;
use crate::domain::user::User;

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("failed to create token: {0}")]
    TokenCreation(String),
    #[error("failed to verify token: {0}")]
    TokenVerification(String),
}

/// A signed access token and the moment it stops being accepted.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies HS256 access tokens.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audiences: Vec<String>,
    duration: Duration,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audiences: config.audiences.clone(),
            duration: Duration::minutes(config.duration_minutes),
        }
    }

    /// Create a token for `user`, issued at `now`.
    pub fn create_token(&self, user: &User, now: DateTime<Utc>) -> Result<IssuedToken, JwtError> {
        let expires_at = now + self.duration;

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            unique_name: user.user_name.clone(),
            full_name: user.full_name.clone(),
            jti: Uuid::new_v4().to_string(),
            roles: user.roles.clone(),
            iss: self.issuer.clone(),
            aud: self.audiences.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::TokenCreation(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify signature, issuer, audience and expiry, and return the claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&self.audiences);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| JwtError::TokenVerification(e.to_string()))?;

        Ok(token_data.claims)
    }
}
