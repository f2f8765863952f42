// src/auth/password.rs
use anyhow::{Context, Result};

pub use bcrypt::DEFAULT_COST;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost).context("Failed to hash password")
}

/// Constant-time check of `password` against a stored bcrypt hash. Errors
/// only when the stored hash itself is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash).context("Stored password hash is malformed")
}
