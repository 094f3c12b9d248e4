//! Verification of access tokens issued by the identity provider.
//!
//! Tokens are HS256-signed JWTs. The site never issues tokens itself; it
//! verifies them, reads the [`Claims`], and forwards the raw token to the
//! upstream API unchanged.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims the site reads from an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the identity provider's user id.
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Role claim (e.g. `"admin"`, `"student"`).
    #[serde(default)]
    pub role: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Configuration for token verification.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the identity provider.
    pub secret: String,
    /// Expected `iss` claim, if the provider sets one.
    pub issuer: Option<String>,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var           | Required | Default |
    /// |-------------------|----------|---------|
    /// | `AUTH_JWT_SECRET` | **yes**  | --      |
    /// | `AUTH_JWT_ISSUER` | no       | --      |
    ///
    /// # Panics
    ///
    /// Panics if `AUTH_JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("AUTH_JWT_SECRET")
            .expect("AUTH_JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "AUTH_JWT_SECRET must not be empty");

        let issuer = std::env::var("AUTH_JWT_ISSUER")
            .ok()
            .filter(|s| !s.trim().is_empty());

        Self { secret, issuer }
    }
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration, plus the issuer when configured.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default(); // HS256, validates exp
    if let Some(issuer) = &config.issuer {
        validation.set_issuer(&[issuer]);
    }
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            issuer: None,
        }
    }

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    fn sign(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    #[test]
    fn valid_token_decodes_claims() {
        let config = test_config();
        let token = sign(
            json!({ "sub": "u1", "email": "a@b.com", "role": "admin", "exp": now() + 600 }),
            &config.secret,
        );
        let claims = validate_token(&token, &config).expect("token should validate");
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.email.as_deref(), Some("a@b.com"));
        assert_eq!(claims.role.as_deref(), Some("admin"));
    }

    #[test]
    fn role_and_email_are_optional() {
        let config = test_config();
        let token = sign(json!({ "sub": "u2", "exp": now() + 600 }), &config.secret);
        let claims = validate_token(&token, &config).unwrap();
        assert!(claims.role.is_none());
        assert!(claims.email.is_none());
    }

    #[test]
    fn expired_token_fails() {
        let config = test_config();
        // Well beyond the default 60-second leeway.
        let token = sign(json!({ "sub": "u1", "exp": now() - 300 }), &config.secret);
        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn wrong_secret_fails() {
        let config = test_config();
        let token = sign(json!({ "sub": "u1", "exp": now() + 600 }), "another-secret");
        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn issuer_enforced_when_configured() {
        let config = JwtConfig {
            issuer: Some("https://id.example.com".into()),
            ..test_config()
        };
        let wrong = sign(
            json!({ "sub": "u1", "iss": "https://evil.example.com", "exp": now() + 600 }),
            &config.secret,
        );
        let right = sign(
            json!({ "sub": "u1", "iss": "https://id.example.com", "exp": now() + 600 }),
            &config.secret,
        );
        assert!(validate_token(&wrong, &config).is_err());
        assert!(validate_token(&right, &config).is_ok());
    }
}
