//! One-way password hashing.
//!
//! The upload pipeline hashes a single default credential once per upload
//! and shares the resulting hash across every inserted row; hashing is never
//! performed inside the per-row loop.

use bcrypt::{hash, verify};

use crate::error::AppError;

/// Hashes a plaintext password with the given bcrypt cost factor.
pub fn hash_password(plain: &str, cost: u32) -> Result<String, AppError> {
    hash(plain, cost).map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verifies a plaintext password against a stored bcrypt hash.
pub fn verify_password(plain: &str, hashed: &str) -> Result<bool, AppError> {
    verify(plain, hashed).map_err(|e| AppError::Internal(format!("Failed to verify password: {e}")))
}
