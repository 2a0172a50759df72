//! Signed bearer tokens
//!
//! Format: `base64url(claims_json) + "." + hex(HMAC-SHA256(secret, base64 part))`.
//! Claims serialize with sorted keys and no whitespace.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Deserializer, Serialize};
use sha2::Sha256;

use super::{parse_flexible_id, AuthError};

type HmacSha256 = Hmac<Sha256>;

/// Token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(deserialize_with = "flexible_id")]
    pub business_id: i64,
    pub email: String,
    #[serde(default)]
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
    #[serde(deserialize_with = "flexible_id")]
    pub user_id: i64,
}

/// Older tokens carried ids such as `usr_a05daf223277`
fn flexible_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(n) => Ok(n),
        Raw::Text(s) => parse_flexible_id(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid id: {}", s))),
    }
}

/// Issues and verifies access tokens
pub struct TokenSigner {
    secret: String,
    ttl_secs: i64,
}

impl TokenSigner {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            secret: secret.to_string(),
            ttl_secs,
        }
    }

    fn mac(&self, msg: &[u8]) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
        mac.update(msg);
        mac
    }

    /// Sign a token for the user; `iat`/`exp` are set from now and the TTL
    pub fn issue(&self, user_id: i64, email: &str, business_id: i64) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        self.sign(&Claims {
            business_id,
            email: email.to_string(),
            exp: now + self.ttl_secs,
            iat: now,
            user_id,
        })
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        let json = serde_json::to_vec(claims).map_err(|_| AuthError::Malformed)?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let sig = hex::encode(self.mac(payload.as_bytes()).finalize().into_bytes());
        Ok(format!("{}.{}", payload, sig))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let (payload, sig) = token.trim().split_once('.').ok_or(AuthError::Malformed)?;

        let sig = hex::decode(sig).map_err(|_| AuthError::BadSignature)?;
        self.mac(payload.as_bytes())
            .verify_slice(&sig)
            .map_err(|_| AuthError::BadSignature)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|_| AuthError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&json).map_err(|_| AuthError::Malformed)?;

        if Utc::now().timestamp() > claims.exp {
            return Err(AuthError::Expired);
        }
        Ok(claims)
    }
}
