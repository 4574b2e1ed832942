use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded bearer token.
///
/// Tokens carry whatever the client asked to sign; only `email` is read by
/// the server, the rest is kept verbatim in `extra`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iat: usize,
    pub exp: usize,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// True when the token was issued for `email`.
    pub fn is_for(&self, email: &str) -> bool {
        self.email.as_deref() == Some(email)
    }
}

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::hours(1))
    }

    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Signs `payload` with fresh `iat`/`exp` claims; client-supplied values
    /// for those two are overwritten.
    pub fn issue(&self, mut payload: Map<String, Value>) -> Result<String, String> {
        let now = Utc::now();
        payload.insert("iat".into(), Value::from(now.timestamp()));
        payload.insert("exp".into(), Value::from((now + self.ttl).timestamp()));

        encode(&Header::default(), &Value::Object(payload), &self.encoding)
            .map_err(|e| format!("Failed to generate token: {}", e))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, String> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Payloads are arbitrary, so an `aud` claim must not make them unverifiable.
        validation.validate_aud = false;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| format!("Invalid token: {}", e))
    }
}
