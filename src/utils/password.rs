use anyhow::{Context, Result};
use std::env;

/// bcrypt cost, overridable with `BCRYPT_COST` (clamped to bcrypt's 4..=31).
fn bcrypt_cost() -> u32 {
    env::var("BCRYPT_COST")
        .ok()
        .and_then(|s| s.trim().parse::<u32>().ok())
        .map(|c| c.clamp(4, 31))
        .unwrap_or(bcrypt::DEFAULT_COST)
}

pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt_cost()).context("Failed to hash password")
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash).context("Failed to verify password")
}
