use sha2::{Digest, Sha256};

/// SHA-256 of the raw password, lowercase hex.
///
/// This is a fast digest, not a key-derivation function, and it is compared
/// inside the lookup query rather than in constant time. Rows written by
/// earlier deployments (including the seeded demo user) depend on this exact
/// format.
pub fn digest_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_known_value() {
        assert_eq!(
            digest_password("password123"),
            "ef92b778bafe771e89245b89ecbc08a44a4e166c06659911881f383d4473e94f"
        );
    }

    #[test]
    fn test_digest_deterministic() {
        let h1 = digest_password("correct horse");
        let h2 = digest_password("correct horse");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
    }

    #[test]
    fn test_digest_different_inputs() {
        assert_ne!(digest_password("password-a"), digest_password("password-b"));
    }
}
