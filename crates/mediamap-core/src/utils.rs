//! Hashing and naming helpers used for directory derivation.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// First 8 hex characters of the SHA-256 of `value`.
pub fn short_hash(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    hex::encode(digest)[..8].to_string()
}

/// Short hash of a fresh random UUID.
pub fn random_short_hash() -> String {
    short_hash(&Uuid::new_v4().to_string())
}

/// Lower-snake-case a short type name: `UserProfile` -> `user_profile`.
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
