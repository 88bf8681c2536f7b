//! Bearer token issuing and hashing.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Generate a new opaque bearer token.
pub fn generate_token() -> String {
    Uuid::new_v4().to_string()
}

/// SHA-256 hex digest of a token, the form stored in the database.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable_hex() {
        let hash = hash_token("abc");
        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(hash_token("abc"), hash);
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_ne!(hash_token(&a), hash_token(&b));
    }
}
