use bcrypt::{hash, verify};

use crate::error::AppError;

/// Work factor for stored hashes. Hashing is deliberately CPU-bound.
const BCRYPT_COST: u32 = 12;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    Ok(hash(password, BCRYPT_COST)?)
}

pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    Ok(verify(password, hashed_password)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing_and_verification() {
        let password = "test_password123";
        let hashed = hash_password(password).unwrap();

        assert_ne!(hashed, password, "plaintext must never equal the hash");
        assert!(verify_password(password, &hashed).unwrap());
        assert!(!verify_password("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn test_verify_with_invalid_hash() {
        match verify_password("test_password123", "invalidhashformat") {
            Err(AppError::Internal(_)) => {}
            Ok(false) => {
                // bcrypt may also report a malformed hash as a plain
                // verification failure.
            }
            Ok(true) => panic!("verification must fail for an invalid hash format"),
            Err(e) => panic!("unexpected error: {:?}", e),
        }
    }
}
