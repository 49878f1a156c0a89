//! One-way identifier hashing.

use sha2::Digest;
use uuid::Uuid;

/// Prefix of hashed identifiers.
pub const HASH_PREFIX: &str = "HASH_";

/// Prefix of placeholder tokens. Differs from [`HASH_PREFIX`] so a
/// placeholder can never equal a digest.
pub const PLACEHOLDER_PREFIX: &str = "ANON_";

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    hex::encode(digest)
}

/// `HASH_` followed by the upper-case SHA-256 of the trimmed value and salt.
pub fn hash_identifier(value: &str, salt: &str) -> String {
    let mut material = String::with_capacity(value.len() + salt.len());
    material.push_str(value.trim());
    material.push_str(salt);
    format!("{HASH_PREFIX}{}", sha256_hex(material.as_bytes()).to_uppercase())
}

/// Random token for a missing identifier.
pub fn placeholder_token() -> String {
    format!(
        "{PLACEHOLDER_PREFIX}{}",
        Uuid::new_v4().simple().to_string().to_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_full_digest_with_prefix() {
        let hashed = hash_identifier("12345", "salt");
        assert!(hashed.starts_with(HASH_PREFIX));
        assert_eq!(hashed.len(), HASH_PREFIX.len() + 64);
        assert_eq!(hashed, hash_identifier(" 12345 ", "salt"));
        assert_ne!(hashed, hash_identifier("12345", "other"));
    }

    #[test]
    fn known_digest() {
        // sha256("abc")
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn placeholders_are_unique_tokens() {
        let first = placeholder_token();
        let second = placeholder_token();
        assert!(first.starts_with(PLACEHOLDER_PREFIX));
        assert_eq!(first.len(), PLACEHOLDER_PREFIX.len() + 32);
        assert_ne!(first, second);
    }
}
