//! Authentication
//!
//! Users sign in with a 6-digit code emailed to them. A verified code is
//! exchanged for an HMAC-signed bearer token carrying the user's id, email
//! and default business. Every receipt route is scoped to a business the
//! token holder belongs to.

mod codes;
mod extract;
mod mailer;
mod token;

pub use codes::LoginCodeStore;
pub use extract::{AuthContext, ScopedBusiness, BUSINESS_HEADER};
pub use mailer::{MailError, Mailer};
pub use token::{Claims, TokenSigner};

use thiserror::Error;

/// Token verification failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("malformed token")]
    Malformed,

    #[error("bad token signature")]
    BadSignature,

    #[error("token expired")]
    Expired,
}

/// Trim and lowercase
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && email.contains('@')
}

/// Accepts ints, numeric strings, `biz_`/`usr_` prefixed ids and hex strings
pub fn parse_flexible_id(raw: &str) -> Option<i64> {
    let mut s = raw.trim();
    for prefix in ["biz_", "usr_"] {
        if s.len() >= prefix.len() && s[..prefix.len()].eq_ignore_ascii_case(prefix) {
            s = s[prefix.len()..].trim();
        }
    }
    if s.is_empty() {
        return None;
    }
    if s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse().ok();
    }
    i64::from_str_radix(s, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flexible_id() {
        assert_eq!(parse_flexible_id("42"), Some(42));
        assert_eq!(parse_flexible_id(" 7 "), Some(7));
        assert_eq!(parse_flexible_id("biz_1f"), Some(31));
        assert_eq!(parse_flexible_id("USR_10"), Some(10));
        assert_eq!(parse_flexible_id("a05daf223277"), Some(0xa05daf223277));
        assert_eq!(parse_flexible_id("biz_"), None);
        assert_eq!(parse_flexible_id("not-an-id"), None);
        assert_eq!(parse_flexible_id(""), None);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Owner@Example.COM "), "owner@example.com");
        assert!(is_valid_email("a@b"));
        assert!(!is_valid_email("nobody"));
        assert!(!is_valid_email(""));
    }
}
