use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash, PasswordHasher,
    PasswordVerifier, Version,
};

/// Password hashing error
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to initialize Argon2 with secret: {0}")]
    InvalidPepper(String),

    #[error("Password hashing error: {0}")]
    HashingFailed(String),
}

fn argon2_with_pepper(pepper: &str) -> Result<Argon2<'_>, PasswordError> {
    Argon2::new_with_secret(
        pepper.as_bytes(),
        Algorithm::Argon2id,
        Version::V0x13,
        Params::default(),
    )
    .map_err(|e| PasswordError::InvalidPepper(e.to_string()))
}

/// Hash a password with Argon2id, using the server pepper as the secret
/// parameter. Every stored credential (admin, reseller, license) goes
/// through here.
pub fn hash_password(pepper: &str, password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut rand_core::OsRng);
    let argon2 = argon2_with_pepper(pepper)?;

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a stored Argon2id hash. The comparison
/// inside argon2 is constant-time; any parse or verify failure reads as
/// a mismatch.
pub fn verify_password(pepper: &str, password: &str, stored_hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(stored_hash) {
        Ok(hash) => hash,
        Err(_) => return false,
    };

    let argon2 = match argon2_with_pepper(pepper) {
        Ok(argon2) => argon2,
        Err(_) => return false,
    };

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEPPER: &str = "test-pepper-for-unit-tests";

    #[test]
    fn test_hash_password_produces_argon2_hash() {
        let hash = hash_password(PEPPER, "secret123").expect("hashing failed");

        assert_ne!(hash, "secret123");
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_verify_password_accepts_correct_password() {
        let hash = hash_password(PEPPER, "secret123").expect("hashing failed");

        assert!(verify_password(PEPPER, "secret123", &hash));
    }

    #[test]
    fn test_verify_password_rejects_wrong_password() {
        let hash = hash_password(PEPPER, "secret123").expect("hashing failed");

        assert!(!verify_password(PEPPER, "wrongpass", &hash));
    }

    #[test]
    fn test_verify_password_rejects_wrong_pepper() {
        let hash = hash_password(PEPPER, "secret123").expect("hashing failed");

        assert!(!verify_password("different-pepper", "secret123", &hash));
    }

    #[test]
    fn test_verify_password_rejects_garbage_hash() {
        assert!(!verify_password(PEPPER, "secret123", "not-a-hash"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hash1 = hash_password(PEPPER, "secret123").expect("hashing failed");
        let hash2 = hash_password(PEPPER, "secret123").expect("hashing failed");

        assert_ne!(hash1, hash2);
    }
}
