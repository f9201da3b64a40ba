use anyhow::{Result, anyhow};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

/// Hash a plaintext password into an argon2id PHC string. A fresh random
/// salt is generated per call, so two hashes of the same plaintext never
/// match. Cost parameters are the argon2 crate defaults — a process-wide
/// constant, never user input.
pub fn hash(plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let digest = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {}", e))?
        .to_string();

    Ok(digest)
}

/// Verify a plaintext password against a stored digest. Comparison is
/// constant-time, delegated to the argon2 verifier. An unparseable digest
/// verifies as false rather than erroring.
pub fn verify(plaintext: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verify_roundtrip() {
        let digest = hash("secretpw").unwrap();
        assert!(verify("secretpw", &digest));
        assert!(!verify("wrongpw", &digest));
    }

    #[test]
    fn same_plaintext_hashes_differently() {
        let a = hash("secretpw").unwrap();
        let b = hash("secretpw").unwrap();
        assert_ne!(a, b);

        // both still verify
        assert!(verify("secretpw", &a));
        assert!(verify("secretpw", &b));
    }

    #[test]
    fn digest_is_not_the_plaintext() {
        let digest = hash("secretpw").unwrap();
        assert!(!digest.contains("secretpw"));
    }

    #[test]
    fn garbage_digest_verifies_false() {
        assert!(!verify("secretpw", "not-a-phc-string"));
        assert!(!verify("secretpw", ""));
    }
}
