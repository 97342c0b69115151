//! JWT token creation.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use snipvault_core::config::AuthConfig;
use snipvault_core::error::AppError;
use snipvault_core::types::OwnerId;

use super::claims::Claims;

/// Creates signed HS256 access tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    access_ttl_minutes: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl_minutes: config.jwt_access_ttl_minutes as i64,
        }
    }

    /// Issues an access token for the given owner.
    pub fn generate_access_token(
        &self,
        owner_id: &OwnerId,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        self.generate_with_ttl(owner_id, chrono::Duration::minutes(self.access_ttl_minutes))
    }

    /// Issues a token with an explicit lifetime (negative values yield expired tokens).
    pub fn generate_with_ttl(
        &self,
        owner_id: &OwnerId,
        ttl: chrono::Duration,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        if owner_id.is_reserved() {
            return Err(AppError::validation(format!(
                "Owner id '{owner_id}' uses a reserved prefix"
            )));
        }

        let now = Utc::now();
        let exp = now + ttl;
        let claims = Claims {
            sub: owner_id.as_str().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        Ok((token, exp))
    }
}
