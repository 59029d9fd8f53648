//! HS256 session token issuance and verification.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::claims::SessionClaims;
use crate::config::AuthConfig;
use crate::error::{AuthError, TokenError};

/// On-the-wire payload: the session claims plus `exp` when a lifetime is set.
#[derive(Debug, Serialize, Deserialize)]
struct TokenPayload {
    #[serde(flatten)]
    claims: SessionClaims,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

/// Signs and verifies stateless session tokens with a process-wide secret.
///
/// Immutable after construction; share it behind an `Arc` across requests.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl TokenIssuer {
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let ttl = config
            .token_ttl_secs
            .map(|secs| {
                i64::try_from(secs)
                    .ok()
                    .and_then(Duration::try_seconds)
                    .ok_or_else(|| AuthError::InvalidConfig(format!("token ttl out of range: {secs}")))
            })
            .transpose()?;

        Self::new(config.jwt_secret.as_bytes(), ttl)
    }

    pub fn new(secret: &[u8], ttl: Option<Duration>) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::InvalidConfig("signing secret must not be empty".into()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = ttl.is_some();
        validation.leeway = 0;
        if ttl.is_some() {
            validation.required_spec_claims.insert("exp".to_string());
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    pub fn issue(&self, claims: &SessionClaims) -> Result<String, AuthError> {
        self.issue_at(claims, Utc::now())
    }

    /// Issue a token as if it were minted at `issued_at` (expiry is relative to it).
    fn issue_at(&self, claims: &SessionClaims, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let payload = TokenPayload {
            claims: claims.clone(),
            exp: self.ttl.map(|ttl| (issued_at + ttl).timestamp()),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &payload, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify signature, structure and (if configured) expiry.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        jsonwebtoken::decode::<TokenPayload>(token, &self.decoding, &self.validation)
            .map(|data| data.claims.claims)
            .map_err(|e| {
                tracing::debug!(kind = ?e.kind(), "session token rejected");
                TokenError::Invalid
            })
    }
}
