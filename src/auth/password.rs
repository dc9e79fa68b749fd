use crate::error::AppError;
use bcrypt::{hash, verify};

/// Salted bcrypt hashing with a configurable work factor.
///
/// Hashing and verification are CPU bound; callers on the request path run them
/// through `web::block`.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    /// Hash of a throwaway password, checked when a login names an unknown user
    /// so both failure paths spend the same bcrypt work.
    decoy_hash: String,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, AppError> {
        let decoy_hash = hash("decoy-password", cost)
            .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))?;
        Ok(Self { cost, decoy_hash })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash(password, self.cost)
            .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
    }

    /// Returns `false` for a wrong password and for a hash bcrypt cannot parse.
    pub fn verify(&self, password: &str, hashed_password: &str) -> bool {
        verify(password, hashed_password).unwrap_or_else(|e| {
            log::warn!("stored password hash could not be checked: {}", e);
            false
        })
    }

    /// Burns one verification against the decoy hash. Always `false`.
    pub fn verify_decoy(&self, password: &str) -> bool {
        let _ = verify(password, &self.decoy_hash);
        false
    }
}
