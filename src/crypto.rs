//! Cryptographic primitives for merklechain

use sha2::{Digest, Sha256};

/// Type alias for a hex-encoded SHA-256 digest.
///
/// Every hash the engine stores or compares is carried in this form: 64
/// lowercase hex characters. The empty string is reserved as the
/// "empty Merkle tree" sentinel and is never produced by [`sha256_hex`].
pub type HexDigest = String;

/// Length in characters of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Compute the SHA-256 digest of arbitrary bytes as a lowercase hex string.
///
/// Deterministic and infallible for any finite input. Merkle folding and
/// membership checks funnel through this function; block hashing feeds the
/// same algorithm incrementally and yields the same digest format.
pub fn sha256_hex(input: impl AsRef<[u8]>) -> HexDigest {
    hex::encode(Sha256::digest(input.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        // FIPS 180-2 test vectors
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_digest_shape() {
        let digest = sha256_hex("merklechain");
        assert_eq!(digest.len(), DIGEST_HEX_LEN);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, digest.to_lowercase());
    }

    #[test]
    fn test_determinism() {
        assert_eq!(sha256_hex("same input"), sha256_hex("same input"));
        assert_ne!(sha256_hex("input a"), sha256_hex("input b"));
    }

    #[test]
    fn test_accepts_bytes_and_strings() {
        assert_eq!(sha256_hex("abc"), sha256_hex(b"abc"));
        assert_eq!(sha256_hex(String::from("abc")), sha256_hex("abc"));
    }
}
