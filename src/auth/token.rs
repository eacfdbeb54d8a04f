use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Represents the claims encoded within a bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the account's email.
    pub sub: String,
    /// Role label carried for the token's lifetime.
    pub role: String,
    /// Issuance timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Issues and verifies HMAC-signed, time-limited bearer tokens.
///
/// Key material and lifetime are fixed at construction and passed in by the
/// caller, so tests can build services with secrets of their own. Tokens are
/// valid until expiry; there is no revocation.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: &str, lifetime_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime: Duration::minutes(lifetime_minutes),
        }
    }

    /// Produces a signed token for the given subject and role, expiring
    /// after the configured lifetime.
    pub fn issue(&self, subject: &str, role: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(self.lifetime)
            .expect("valid timestamp");

        let claims = Claims {
            sub: subject.to_string(),
            role: role.to_string(),
            iat: now.timestamp() as usize,
            exp: expires.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Parses a token and checks signature, algorithm, and expiry.
    ///
    /// Only HS256 is accepted: a token whose header carries any other
    /// algorithm is rejected before its signature is considered. Every
    /// failure collapses to the same `Unauthorized` value so callers cannot
    /// distinguish malformed from expired from tampered; the concrete cause
    /// goes to the debug log only.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("token verification failed: {}", e);
                AppError::Unauthorized("Invalid token".into())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let tokens = TokenService::new("roundtrip-secret", 15);
        let token = tokens.issue("a@x.com", "USER").unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.role, "USER");
        assert!(claims.iat < claims.exp);
    }

    #[test]
    fn test_expired_token_fails_despite_valid_signature() {
        let tokens = TokenService::new("expiry-secret", 15);

        let stale = Utc::now()
            .checked_sub_signed(Duration::hours(2))
            .expect("valid timestamp");
        let claims = Claims {
            sub: "a@x.com".to_string(),
            role: "USER".to_string(),
            iat: stale.timestamp() as usize,
            exp: (stale + Duration::minutes(15)).timestamp() as usize,
        };
        let expired = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("expiry-secret".as_bytes()),
        )
        .unwrap();

        match tokens.verify(&expired) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid token"),
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_token_signed_with_different_key_fails() {
        let issuer = TokenService::new("key-one", 15);
        let verifier = TokenService::new("key-two", 15);

        let token = issuer.issue("a@x.com", "USER").unwrap();
        assert!(verifier.verify(&token).is_err());
        // And the issuer itself still accepts it.
        assert!(issuer.verify(&token).is_ok());
    }

    #[test]
    fn test_unexpected_algorithm_is_rejected() {
        let tokens = TokenService::new("alg-secret", 15);
        let now = Utc::now();
        let claims = Claims {
            sub: "a@x.com".to_string(),
            role: "USER".to_string(),
            iat: now.timestamp() as usize,
            exp: (now + Duration::minutes(15)).timestamp() as usize,
        };
        // Same key, different MAC algorithm in the header.
        let downgraded = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret("alg-secret".as_bytes()),
        )
        .unwrap();

        assert!(tokens.verify(&downgraded).is_err());
    }

    #[test]
    fn test_malformed_token_fails_uniformly() {
        let tokens = TokenService::new("garbage-secret", 15);

        for garbage in ["", "not.a.jwt", "Bearer something", "a.b"] {
            match tokens.verify(garbage) {
                Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid token"),
                other => panic!("expected Unauthorized for {:?}, got {:?}", garbage, other),
            }
        }
    }
}
