use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::auth::{claims::Claims, repo_types::User};
use crate::config::JwtConfig;

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,
    #[error("token expired")]
    Expired,
    #[error("token expiry out of range")]
    ExpiryOutOfRange,
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies HS256 bearer tokens. Stateless; no I/O.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    lifespan: Duration,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str, issuer: impl Into<String>, lifespan: Duration) -> Self {
        let issuer = issuer.into();

        // Only HS256 is accepted; any other header alg fails before signature checks.
        let mut validation = Validation::new(ALGORITHM);
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            lifespan,
            validation,
        }
    }

    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self::new(&cfg.secret, cfg.issuer.clone(), Duration::hours(cfg.ttl_hours))
    }

    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let now = OffsetDateTime::now_utc();
        let expires = now
            .checked_add(self.lifespan)
            .ok_or(TokenError::ExpiryOutOfRange)?;
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iss: self.issuer.clone(),
            iat: now.unix_timestamp(),
            exp: expires.unix_timestamp(),
        };
        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(TokenError::Signing)?;
        debug!(user_id = user.id, "jwt signed");
        Ok(token)
    }

    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;
        debug!(sub = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }

    /// Subject as a user id; 0 when absent or not a positive integer.
    pub fn extract_user_id(claims: &Claims) -> i64 {
        claims
            .sub
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id,
            username: "alice".into(),
            password_hash: String::new(),
            email: "a@x.com".into(),
            created_at: now,
            updated_at: now,
        }
    }

    fn service(secret: &str) -> TokenService {
        TokenService::new(secret, "movies-api", Duration::hours(24))
    }

    fn claims_for(id: &str, exp_offset: Duration) -> Claims {
        let now = OffsetDateTime::now_utc();
        Claims {
            sub: id.into(),
            username: "alice".into(),
            iss: "movies-api".into(),
            iat: now.unix_timestamp(),
            exp: (now + exp_offset).unix_timestamp(),
        }
    }

    #[test]
    fn issue_and_validate_roundtrip() {
        let tokens = service("dev-secret");
        let token = tokens.issue(&user(7)).expect("sign");
        let claims = tokens.validate(&token).expect("verify");
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.iss, "movies-api");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert_eq!(TokenService::extract_user_id(&claims), 7);
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = TokenService::new("dev-secret", "movies-api", Duration::hours(-1));
        let token = tokens.issue(&user(1)).unwrap();
        assert!(matches!(tokens.validate(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn unrepresentable_expiry_is_an_error() {
        let tokens = TokenService::new("dev-secret", "movies-api", Duration::hours(100_000_000));
        assert!(matches!(
            tokens.issue(&user(1)),
            Err(TokenError::ExpiryOutOfRange)
        ));
    }

    #[test]
    fn other_secret_is_rejected() {
        let token = service("secret-a").issue(&user(1)).unwrap();
        assert!(matches!(
            service("secret-b").validate(&token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn other_hmac_algorithm_is_rejected() {
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims_for("1", Duration::hours(1)),
            &EncodingKey::from_secret(b"dev-secret"),
        )
        .unwrap();
        assert!(matches!(
            service("dev-secret").validate(&token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn unsigned_token_is_rejected() {
        // {"alg":"none","typ":"JWT"} with a valid payload and empty signature
        let header = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0";
        let signed = service("dev-secret").issue(&user(1)).unwrap();
        let payload = signed.split('.').nth(1).unwrap();
        let token = format!("{header}.{payload}.");
        assert!(matches!(
            service("dev-secret").validate(&token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let other = TokenService::new("dev-secret", "someone-else", Duration::hours(1));
        let token = other.issue(&user(1)).unwrap();
        assert!(service("dev-secret").validate(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            service("dev-secret").validate("not.a.jwt"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn malformed_subject_means_no_identity() {
        assert_eq!(TokenService::extract_user_id(&claims_for("abc", Duration::hours(1))), 0);
        assert_eq!(TokenService::extract_user_id(&claims_for("", Duration::hours(1))), 0);
        assert_eq!(TokenService::extract_user_id(&claims_for("-3", Duration::hours(1))), 0);
    }
}
