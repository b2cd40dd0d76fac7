//! Signed, time-boxed tokens.
//!
//! Thin wrapper over `jsonwebtoken` using HS256. Payload fields are flattened
//! next to the registered `exp`/`nbf` claims so issued tokens stay readable by
//! any standard JWT library.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize)]
struct Claims<T> {
    #[serde(flatten)]
    payload: T,
    exp: i64,
    nbf: i64,
}

/// HS256 token codec bound to a signing key.
#[derive(Clone)]
pub struct Jwt {
    key: String,
}

impl std::fmt::Debug for Jwt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Jwt").field("key", &"<redacted>").finish()
    }
}

impl Jwt {
    /// Create a codec for the given key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Encode a payload, valid from `not_before` until `expires` (unix seconds).
    pub fn encode<T: Serialize>(&self, payload: T, expires: i64, not_before: i64) -> AppResult<String> {
        if self.key.is_empty() {
            return Err(AppError::Config("Missing JWT signing key".to_string()));
        }

        let claims = Claims {
            payload,
            exp: expires,
            nbf: not_before,
        };

        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.key.as_bytes()),
        )?)
    }

    /// Decode and verify a token. Fails on bad signature, malformed input or expiry.
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> AppResult<T> {
        if self.key.is_empty() {
            return Err(AppError::Config("Missing JWT signing key".to_string()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_nbf = true;

        let data = jsonwebtoken::decode::<Claims<T>>(
            token,
            &DecodingKey::from_secret(self.key.as_bytes()),
            &validation,
        )?;

        Ok(data.claims.payload)
    }
}
