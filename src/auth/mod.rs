pub mod guard;
pub mod password;
pub mod token;

use actix_web::web;
use serde::{Deserialize, Serialize};

use crate::{error::AppError, models::User, store::Store};

// Re-export necessary items
pub use guard::{current_identity, CurrentUser};
pub use password::PasswordHasher;
pub use token::{Claims, TokenError, TokenService, DEFAULT_TOKEN_TTL_MINUTES, LOGIN_TOKEN_TTL_MINUTES};

/// The caller as established by a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub user_id: i32,
}

/// Form fields posted to the token endpoint.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Body returned by the token endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Looks up `username` and checks `password` against its stored hash.
///
/// Returns `Ok(None)` both for an unknown user and for a wrong password. An unknown
/// user still pays for one bcrypt verification so the two cases take the same time.
pub async fn authenticate(
    store: &dyn Store,
    hasher: &PasswordHasher,
    username: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    let user = store.find_user_by_username(username).await?;

    let hasher = hasher.clone();
    let password = password.to_string();
    let stored_hash = user.as_ref().map(|u| u.hashed_password.clone());
    let matches = web::block(move || match stored_hash {
        Some(stored_hash) => hasher.verify(&password, &stored_hash),
        None => hasher.verify_decoy(&password),
    })
    .await?;

    Ok(user.filter(|_| matches))
}

/// A todo may be touched only by the user who owns it.
pub fn authorize_owner(resource_owner_id: i32, identity: &Identity) -> bool {
    resource_owner_id == identity.user_id
}
