//! One-time login codes
//!
//! Codes live in memory only; a restart invalidates outstanding codes.

use std::collections::HashMap;

use chrono::Utc;
use hmac::{Hmac, Mac};
use parking_lot::Mutex;
use rand::Rng;
use sha2::Sha256;

use super::normalize_email;

type HmacSha256 = Hmac<Sha256>;

struct PendingCode {
    digest: Vec<u8>,
    expires_at: i64,
}

/// Issued codes keyed by normalized email
pub struct LoginCodeStore {
    salt: String,
    ttl_secs: i64,
    codes: Mutex<HashMap<String, PendingCode>>,
}

impl LoginCodeStore {
    pub fn new(salt: &str, ttl_secs: i64) -> Self {
        Self {
            salt: salt.to_string(),
            ttl_secs,
            codes: Mutex::new(HashMap::new()),
        }
    }

    fn mac(&self, code: &str) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(self.salt.as_bytes())
            .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
        mac.update(code.as_bytes());
        mac
    }

    /// Issue a fresh code for `email`, replacing any outstanding one
    pub fn issue(&self, email: &str) -> String {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000u32));
        self.insert(email, &code, Utc::now().timestamp() + self.ttl_secs);
        code
    }

    fn insert(&self, email: &str, code: &str, expires_at: i64) {
        let digest = self.mac(code).finalize().into_bytes().to_vec();
        self.codes
            .lock()
            .insert(normalize_email(email), PendingCode { digest, expires_at });
    }

    /// Check a code; a matching code is consumed, an expired one discarded
    pub fn verify(&self, email: &str, code: &str) -> bool {
        let email = normalize_email(email);
        let mut codes = self.codes.lock();

        let Some(pending) = codes.get(&email) else {
            return false;
        };
        if Utc::now().timestamp() > pending.expires_at {
            codes.remove(&email);
            return false;
        }

        let ok = self.mac(code.trim()).verify_slice(&pending.digest).is_ok();
        if ok {
            codes.remove(&email);
        }
        ok
    }
}
