use sha2::{Digest, Sha256};

/// Content fingerprint of uploaded photo bytes: SHA-256, lowercase hex.
///
/// Identical bytes always produce the same fingerprint, which is what the
/// `(photo_hash, reported_by)` uniqueness constraint keys on.
pub fn fingerprint(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_deterministic() {
        let photo = b"\xff\xd8\xff\xe0 fake jpeg body";
        assert_eq!(fingerprint(photo), fingerprint(photo));
    }

    #[test]
    fn fingerprint_differs_for_distinct_content() {
        assert_ne!(fingerprint(b"photo one"), fingerprint(b"photo two"));
        // Single-bit flip changes the digest
        assert_ne!(fingerprint(&[0x00]), fingerprint(&[0x01]));
    }

    #[test]
    fn fingerprint_is_64_hex_chars() {
        let digest = fingerprint(b"");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        // SHA-256 of the empty string, a known vector
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
