/// Password Hashing and Verification
///
/// bcrypt with a fixed work factor. Every hash gets a fresh random salt,
/// so hashing the same password twice gives two different digests.

use bcrypt::hash;

use crate::error::{AppError, ValidationError};

/// bcrypt work factor used for every stored digest.
pub const HASH_COST: u32 = 12;

/// bcrypt only reads this many bytes of input; longer passwords are refused.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hash a password using bcrypt
///
/// # Errors
/// - `ValidationError::EmptyField` when the password is empty
/// - `ValidationError::TooLong` when it exceeds `MAX_PASSWORD_BYTES`
/// - `AppError::Internal` if bcrypt itself fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.is_empty() {
        return Err(AppError::Validation(ValidationError::EmptyField(
            "password".to_string(),
        )));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::Validation(ValidationError::TooLong(
            "password".to_string(),
            MAX_PASSWORD_BYTES,
        )));
    }

    hash(password, HASH_COST)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its bcrypt digest
///
/// Never fails: empty input, a password longer than bcrypt reads, a
/// malformed digest and a plain mismatch all return `false`. The digest
/// comparison itself is constant time.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    if password.is_empty() || password_hash.is_empty() || password.len() > MAX_PASSWORD_BYTES {
        return false;
    }

    match bcrypt::verify(password, password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password digest could not be parsed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let password = "123456";
        let digest = hash_password(password).expect("Failed to hash password");

        assert_ne!(password, digest);
        assert!(digest.starts_with("$2"));
        assert!(digest.contains("$12$"));
    }

    #[test]
    fn test_verify_password() {
        let digest = hash_password("123456").expect("Failed to hash password");
        assert!(verify_password("123456", &digest));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let first = hash_password("123456").expect("Failed to hash password");
        let second = hash_password("123456").expect("Failed to hash password");

        assert_ne!(first, second);
        assert!(verify_password("123456", &first));
        assert!(verify_password("123456", &second));
    }

    #[test]
    fn test_verify_wrong_password() {
        let digest = hash_password("123456").expect("Failed to hash password");
        assert!(!verify_password("1234567", &digest));
        assert!(!verify_password("wrongpass", &digest));
    }

    #[test]
    fn test_empty_password_rejected() {
        let result = hash_password("");
        assert!(matches!(
            result,
            Err(AppError::Validation(ValidationError::EmptyField(_)))
        ));
    }

    #[test]
    fn test_verify_never_errors_on_bad_input() {
        let digest = hash_password("123456").expect("Failed to hash password");

        assert!(!verify_password("", &digest));
        assert!(!verify_password("123456", ""));
        assert!(!verify_password("123456", "not-a-bcrypt-digest"));
        assert!(!verify_password("123456", "$2b$12$tooshort"));
    }

    #[test]
    fn test_passwords_beyond_bcrypt_limit_never_cross_verify() {
        let prefix = "x".repeat(MAX_PASSWORD_BYTES);
        let first = format!("{}A", prefix);
        let second = format!("{}B", prefix);

        assert!(matches!(
            hash_password(&first),
            Err(AppError::Validation(ValidationError::TooLong(_, 72)))
        ));

        let digest = hash_password(&prefix).expect("72 bytes is accepted");
        assert!(verify_password(&prefix, &digest));
        assert!(!verify_password(&first, &digest));
        assert!(!verify_password(&second, &digest));
    }

    #[test]
    fn test_limit_counts_bytes_not_chars() {
        // 37 two-byte characters: 37 chars, 74 bytes
        let password = "é".repeat(37);
        assert!(hash_password(&password).is_err());
    }
}
