//! Session token generation and validation.
//!
//! A session is an HS256-signed JWT carrying the user's id and username.
//! There is no server-side session table: a token is valid until its `exp`,
//! and signing out only drops the client's cookie.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use opcheck_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The user's login name at the time the session was issued.
    pub username: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4), logged on sign-in.
    pub jti: String,
}

/// Configuration for session token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Session lifetime in days (default: 30).
    pub session_max_age_days: i64,
}

/// Default session lifetime in days.
const DEFAULT_SESSION_MAX_AGE_DAYS: i64 = 30;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                | Required | Default |
    /// |------------------------|----------|---------|
    /// | `JWT_SECRET`           | **yes**  | --      |
    /// | `SESSION_MAX_AGE_DAYS` | no       | `30`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let session_max_age_days: i64 = std::env::var("SESSION_MAX_AGE_DAYS")
            .unwrap_or_else(|_| DEFAULT_SESSION_MAX_AGE_DAYS.to_string())
            .parse()
            .expect("SESSION_MAX_AGE_DAYS must be a valid i64");
        assert!(
            session_max_age_days > 0,
            "SESSION_MAX_AGE_DAYS must be positive"
        );

        Self {
            secret,
            session_max_age_days,
        }
    }

    /// Session lifetime in seconds, as used for the cookie `Max-Age`.
    pub fn max_age_secs(&self) -> i64 {
        Duration::days(self.session_max_age_days).num_seconds()
    }
}

/// A freshly signed session token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub claims: Claims,
    pub expires_at: DateTime<Utc>,
}

/// Sign a session token for the given user, valid for the configured lifetime.
pub fn generate_session_token(
    user_id: DbId,
    username: &str,
    config: &JwtConfig,
) -> Result<IssuedSession, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expires_at = now + Duration::days(config.session_max_age_days);

    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(IssuedSession {
        token,
        claims,
        expires_at,
    })
}

/// Validate and decode a session token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            session_max_age_days: 30,
        }
    }

    #[test]
    fn test_generate_and_validate_session_token() {
        let config = test_config();
        let issued = generate_session_token(42, "alice", &config)
            .expect("token generation should succeed");

        let claims =
            validate_token(&issued.token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.username, "alice");
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_session_lasts_thirty_days() {
        let config = test_config();
        let issued = generate_session_token(1, "bob", &config).unwrap();

        assert_eq!(issued.claims.exp - issued.claims.iat, 30 * 24 * 60 * 60);
        assert_eq!(issued.expires_at.timestamp(), issued.claims.exp);
        assert_eq!(config.max_age_secs(), 2_592_000);
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();

        // Well beyond the default 60-second leeway.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            username: "carol".to_string(),
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert!(
            validate_token(&token, &config).is_err(),
            "expired token must fail validation"
        );
    }

    #[test]
    fn test_different_secrets_fail() {
        let config_a = JwtConfig {
            secret: "secret-alpha".to_string(),
            session_max_age_days: 30,
        };
        let config_b = JwtConfig {
            secret: "secret-bravo".to_string(),
            session_max_age_days: 30,
        };

        let issued = generate_session_token(1, "dave", &config_a).unwrap();

        assert!(
            validate_token(&issued.token, &config_b).is_err(),
            "token signed with a different secret must fail"
        );
    }
}
