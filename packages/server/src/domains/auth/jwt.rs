use chrono::Duration;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::kernel::store::Fields;

/// Claims carried by a bearer token: the identity email, the profile fields
/// present at issuance time, and the validity window. Tokens are signed, not
/// encrypted - callers must not embed secrets in the profile.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub email: String,
    pub iat: i64, // Issued at timestamp
    pub exp: i64, // Expiration timestamp
    #[serde(flatten)]
    pub profile: Fields,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("claims are missing an email")]
    MissingEmail,

    #[error("failed to sign token")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("invalid or expired token")]
    Invalid,
}

/// Token service - creates and verifies signed bearer tokens.
///
/// Constructed once at startup from the shared signing secret and never
/// mutated afterwards; concurrent use needs no synchronization.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

/// Validity window for issued tokens.
const TOKEN_TTL_DAYS: i64 = 30;

impl TokenService {
    /// Create a new token service with the standard 30-day validity window.
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::days(TOKEN_TTL_DAYS))
    }

    /// Create a token service with an explicit validity window.
    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Sign a token for the given claims. The mapping must carry an `email`
    /// identity claim; any other fields ride along as profile data.
    pub fn issue(&self, claims: &Fields) -> Result<String, TokenError> {
        let email = claims
            .get("email")
            .and_then(Value::as_str)
            .ok_or(TokenError::MissingEmail)?
            .to_string();

        // Reserved claims are always set here; strip any client-supplied
        // copies so the payload has no duplicate keys.
        let mut profile = claims.clone();
        profile.remove("email");
        profile.remove("iat");
        profile.remove("exp");

        let now = chrono::Utc::now();
        let claims = Claims {
            email,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            profile,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(TokenError::Encode)
    }

    /// Verify and decode a token.
    ///
    /// Pure check: signature plus expiration, nothing else. Profile data
    /// inside the token reflects issuance time and may be stale.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: serde_json::Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_issue_and_verify_token() {
        let service = TokenService::new("test_secret_key");
        let token = service
            .issue(&claims(json!({"email": "a@x.com", "name": "Sam"})))
            .unwrap();

        let decoded = service.verify(&token).unwrap();
        assert_eq!(decoded.email, "a@x.com");
        assert_eq!(decoded.profile["name"], "Sam");
    }

    #[test]
    fn test_issue_requires_email() {
        let service = TokenService::new("test_secret_key");
        let result = service.issue(&claims(json!({"name": "Sam"})));
        assert!(matches!(result, Err(TokenError::MissingEmail)));
    }

    #[test]
    fn test_invalid_token() {
        let service = TokenService::new("test_secret_key");
        assert!(matches!(
            service.verify("invalid_token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_wrong_secret() {
        let service1 = TokenService::new("secret1");
        let service2 = TokenService::new("secret2");

        let token = service1.issue(&claims(json!({"email": "a@x.com"}))).unwrap();

        // Token created with secret1 should not verify with secret2
        assert!(matches!(service2.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = TokenService::with_ttl("test_secret_key", Duration::hours(-1));
        let token = service.issue(&claims(json!({"email": "a@x.com"}))).unwrap();
        assert!(matches!(service.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_expiration_window() {
        let service = TokenService::new("test_secret_key");
        let token = service.issue(&claims(json!({"email": "a@x.com"}))).unwrap();
        let decoded = service.verify(&token).unwrap();

        let expires_in = decoded.exp - chrono::Utc::now().timestamp();
        assert!(expires_in > 29 * 24 * 3600);
        assert!(expires_in <= 30 * 24 * 3600);
    }

    #[test]
    fn test_reserved_claims_not_duplicated() {
        let service = TokenService::new("test_secret_key");
        let token = service
            .issue(&claims(json!({"email": "a@x.com", "exp": 1, "iat": 1})))
            .unwrap();

        // Client-supplied exp/iat must not override the service's values.
        let decoded = service.verify(&token).unwrap();
        assert!(decoded.exp > 1);
        assert!(!decoded.profile.contains_key("exp"));
        assert!(!decoded.profile.contains_key("iat"));
        assert!(!decoded.profile.contains_key("email"));
    }
}
