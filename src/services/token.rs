use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Session lifetime. The cookie max-age mirrors this.
pub const ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 30;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Stateless HS256 bearer tokens. Nothing is stored server-side; expiry is
/// the only way a session ends.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(&self, subject: &str) -> Result<String> {
        let exp = (Utc::now() + Duration::minutes(ACCESS_TOKEN_EXPIRE_MINUTES)).timestamp() as usize;
        let claims = Claims {
            sub: subject.to_string(),
            exp,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// `None` for malformed, tampered, or expired tokens. Callers treat every
    /// invalid token the same way: anonymous.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_yields_subject() {
        let tokens = TokenService::new("test-secret");
        let token = tokens.issue("alice1").unwrap();
        let claims = tokens.verify(&token).expect("token should be valid");
        assert_eq!(claims.sub, "alice1");
    }

    #[test]
    fn tampered_token_is_invalid() {
        let tokens = TokenService::new("test-secret");
        let token = tokens.issue("alice1").unwrap();

        // Flip one character of the signature.
        let mut tampered: Vec<char> = token.chars().collect();
        let last = tampered.len() - 1;
        tampered[last] = if tampered[last] == 'a' { 'b' } else { 'a' };
        let tampered: String = tampered.into_iter().collect();

        assert!(tokens.verify(&tampered).is_none());
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = TokenService::new("test-secret").issue("alice1").unwrap();
        assert!(TokenService::new("other-secret").verify(&token).is_none());
    }

    #[test]
    fn expired_token_is_invalid() {
        let tokens = TokenService::new("test-secret");
        let claims = Claims {
            sub: "alice1".to_string(),
            exp: (Utc::now() - Duration::minutes(5)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(tokens.verify(&token).is_none());
    }

    #[test]
    fn garbage_is_invalid() {
        let tokens = TokenService::new("test-secret");
        assert!(tokens.verify("not-a-token").is_none());
        assert!(tokens.verify("").is_none());
    }
}
