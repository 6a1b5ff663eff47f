//! One-time email codes.
//!
//! Nothing is stored server side: a digest of the code, keyed with the server
//! secret, travels back to the client inside a short-lived signed challenge.
//! The challenge payload is readable by its holder, so the digest must not be
//! computable without the secret.

use chrono::{Duration, Utc};
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{JwtError, JwtService};

pub const OTP_EXPIRES_IN_MINUTES: i64 = 10;
const CHALLENGE_PURPOSE: &str = "otp";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpChallenge {
    pub sub: String,
    pub purpose: String,
    pub code_hash: String,
    pub exp: i64,
    pub iat: i64,
}

/// Six decimal digits, zero padded
pub fn generate_code() -> String {
    format!("{:06}", OsRng.gen_range(0..1_000_000u32))
}

fn hash_code(secret: &str, email: &str, code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update([0u8]);
    hasher.update(email.as_bytes());
    hasher.update(b":");
    hasher.update(code.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn digests_match(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

pub fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    let (local, domain) = email.split_once('@')?;
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return None;
    }
    if email.chars().any(char::is_whitespace) {
        return None;
    }
    Some(email)
}

pub fn issue_challenge(jwt: &JwtService, email: &str, code: &str) -> Result<String, JwtError> {
    let now = Utc::now();
    let challenge = OtpChallenge {
        sub: email.to_string(),
        purpose: CHALLENGE_PURPOSE.to_string(),
        code_hash: hash_code(&jwt.secret, email, code),
        exp: (now + Duration::minutes(OTP_EXPIRES_IN_MINUTES)).timestamp(),
        iat: now.timestamp(),
    };
    jwt.sign_claims(&challenge)
}

/// Returns the verified email when the code matches an unexpired challenge
pub fn verify_challenge(jwt: &JwtService, challenge: &str, code: &str) -> Result<String, JwtError> {
    let claims: OtpChallenge = jwt.verify_claims(challenge)?;
    if claims.purpose != CHALLENGE_PURPOSE {
        return Err(JwtError::InvalidToken("not a code challenge".to_string()));
    }
    if !digests_match(&hash_code(&jwt.secret, &claims.sub, code.trim()), &claims.code_hash) {
        return Err(JwtError::InvalidToken("code mismatch".to_string()));
    }
    Ok(claims.sub)
}
