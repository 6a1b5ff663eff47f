use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::config::SecurityConfig;

pub mod otp;

/// Name of the cookie carrying the session token
pub const COOKIE_NAME: &str = "auth_token";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Stable subject id (Google `sub`, or the email for code sign-in)
    pub sub: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(sub: String, email: String, name: Option<String>, picture: Option<String>, ttl_seconds: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::seconds(ttl_seconds as i64)).timestamp();

        Self {
            sub,
            email,
            name,
            picture,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidSecret,
    InvalidToken(String),
    MissingToken,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
            JwtError::InvalidToken(msg) => write!(f, "Invalid JWT token: {}", msg),
            JwtError::MissingToken => write!(f, "Missing JWT token"),
        }
    }
}

impl std::error::Error for JwtError {}

/// Signs and verifies HS256 tokens with the configured secret
#[derive(Clone)]
pub struct JwtService {
    secret: String,
    expires_in_seconds: u64,
}

impl JwtService {
    pub fn new(secret: impl Into<String>, expires_in_seconds: u64) -> Self {
        Self {
            secret: secret.into(),
            expires_in_seconds,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(security.jwt_secret.clone(), security.jwt_expires_in_seconds)
    }

    pub fn expires_in_seconds(&self) -> u64 {
        self.expires_in_seconds
    }

    /// Issue a session token for the given identity
    pub fn sign(&self, sub: &str, email: &str, name: Option<String>, picture: Option<String>) -> Result<String, JwtError> {
        let claims = Claims::new(sub.to_string(), email.to_string(), name, picture, self.expires_in_seconds);
        self.sign_claims(&claims)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        self.verify_claims(token)
    }

    pub fn sign_claims<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        if self.secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Check signature and expiry, then deserialize the payload
    pub fn verify_claims<T: DeserializeOwned>(&self, token: &str) -> Result<T, JwtError> {
        if token.trim().is_empty() {
            return Err(JwtError::MissingToken);
        }
        if self.secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        decode::<T>(token, &decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))
    }

    /// Read the payload without checking signature or expiry.
    ///
    /// Only for diagnostics; never use the result for authorization.
    pub fn decode_unverified(token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))
    }
}

/// `Set-Cookie` value for a fresh session.
///
/// Secure deployments get `Secure` and `SameSite=Strict`; otherwise `Lax` so
/// the OAuth redirect back from Google still carries the cookie.
pub fn session_cookie(token: &str, max_age_seconds: u64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite={}",
        COOKIE_NAME,
        token,
        max_age_seconds,
        if secure { "Strict" } else { "Lax" }
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test-secret", 3600)
    }

    #[test]
    fn signed_token_verifies() {
        let jwt = service();
        let token = jwt.sign("google-123", "a@b.c", Some("Ada".into()), None).unwrap();

        let claims = jwt.verify(&token).unwrap();
        assert_eq!(claims.sub, "google-123");
        assert_eq!(claims.email, "a@b.c");
        assert_eq!(claims.name.as_deref(), Some("Ada"));
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = service().sign("1", "a@b.c", None, None).unwrap();
        let other = JwtService::new("other-secret", 3600);

        assert!(matches!(other.verify(&token), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = service();
        let mut claims = Claims::new("1".into(), "a@b.c".into(), None, None, 0);
        claims.exp = Utc::now().timestamp() - 3600;
        let token = jwt.sign_claims(&claims).unwrap();

        assert!(matches!(jwt.verify(&token), Err(JwtError::InvalidToken(_))));
        assert_eq!(JwtService::decode_unverified(&token).unwrap().sub, "1");
    }

    #[test]
    fn empty_secret_cannot_sign() {
        let jwt = JwtService::new("", 60);
        assert!(matches!(jwt.sign("1", "a@b.c", None, None), Err(JwtError::InvalidSecret)));
    }

    #[test]
    fn blank_token_is_missing() {
        assert!(matches!(service().verify("  "), Err(JwtError::MissingToken)));
    }

    #[test]
    fn cookie_attributes_follow_security_mode() {
        let dev = session_cookie("abc", 604800, false);
        assert_eq!(dev, "auth_token=abc; HttpOnly; Path=/; Max-Age=604800; SameSite=Lax");

        let prod = session_cookie("abc", 604800, true);
        assert!(prod.ends_with("SameSite=Strict; Secure"));

        assert!(clear_session_cookie(false).starts_with("auth_token=; HttpOnly; Path=/; Max-Age=0"));
    }
}
