use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Identity;

/// The only algorithm tokens are signed and accepted with.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Lifetime of a token when the caller does not ask for one.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 15;

/// Lifetime of the token handed out by the login endpoint.
pub const LOGIN_TOKEN_TTL_MINUTES: i64 = 20;

/// Claims carried by every token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Username of the token holder.
    pub sub: String,
    /// Database id of the token holder.
    pub id: i32,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Shape used while decoding, so absent claims can be told apart from bad types.
#[derive(Debug, Deserialize)]
struct DecodedClaims {
    sub: Option<String>,
    id: Option<i32>,
    exp: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, wrong algorithm, expired, malformed, or missing claims.
    InvalidToken,
    /// The token could not be encoded.
    Signing(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenError::InvalidToken => write!(f, "Invalid token"),
            TokenError::Signing(msg) => write!(f, "Failed to sign token: {}", msg),
        }
    }
}

impl std::error::Error for TokenError {}

/// Issues and verifies HS256 tokens with a secret fixed at construction.
///
/// Changing the secret invalidates every token issued under the old one.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self::with_default_ttl(secret, Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES))
    }

    pub fn with_default_ttl(secret: &str, default_ttl: Duration) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Signs `{sub, id, exp}` where `exp` is now plus `ttl`, or plus the default
    /// lifetime when `ttl` is `None`.
    pub fn issue(
        &self,
        username: &str,
        user_id: i32,
        ttl: Option<Duration>,
    ) -> Result<String, TokenError> {
        let expiration = Utc::now()
            .checked_add_signed(ttl.unwrap_or(self.default_ttl))
            .ok_or_else(|| TokenError::Signing("expiration out of range".into()))?
            .timestamp()
            .max(0) as usize;

        let claims = Claims {
            sub: username.to_string(),
            id: user_id,
            exp: expiration,
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Returns the identity inside `token` only if the signature checks out,
    /// `exp` is still in the future, `sub` is non-empty and `id` is positive.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let data = decode::<DecodedClaims>(token, &self.decoding, &self.validation).map_err(|e| {
            log::debug!("token rejected: {}", e);
            TokenError::InvalidToken
        })?;
        let claims = data.claims;

        if claims.exp as i64 <= Utc::now().timestamp() {
            log::debug!("token rejected: expired at {}", claims.exp);
            return Err(TokenError::InvalidToken);
        }

        match (claims.sub, claims.id) {
            (Some(username), Some(user_id)) if !username.is_empty() && user_id > 0 => Ok(Identity {
                username,
                user_id,
            }),
            _ => {
                log::debug!("token rejected: missing subject or invalid id claim");
                Err(TokenError::InvalidToken)
            }
        }
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &ALGORITHM)
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}
