use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};

/// One-way hashing capability, injected into the user directory at
/// construction so services never reach for a shared singleton.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> anyhow::Result<String>;
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

/// Argon2id with a fresh random salt per hash.
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(plaintext.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash("secret1").unwrap();

        assert_ne!(hash, "secret1");
        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify("secret1", &hash));
        assert!(!hasher.verify("secret2", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        let hasher = Argon2Hasher;
        assert!(!hasher.verify("secret1", "not-a-phc-string"));
    }
}
