use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::ErrorMessage;

/// Maximum allowed password length in characters
///
/// Argon2 is intentionally slow, so unbounded input would let a client
/// burn server CPU with megabyte-sized "passwords". 64 characters is more
/// than enough for a strong passphrase.
const MAX_PASSWORD_LENGTH: usize = 64;

/// Hash a password with Argon2id
///
/// The output is a PHC-format string
/// (`$argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>`) that embeds the salt
/// and cost parameters, so the hash string is the only thing stored.
/// Each call generates a fresh random salt via the OS CSPRNG, so hashing
/// the same password twice yields different strings.
pub fn hash(password: impl Into<String>) -> Result<String, ErrorMessage> {
    let password = password.into();

    if password.is_empty() {
        return Err(ErrorMessage::EmptyPassword);
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ErrorMessage::ExceededMaxPasswordLength(MAX_PASSWORD_LENGTH));
    }

    let salt = SaltString::generate(&mut OsRng);

    let hashed_password = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| ErrorMessage::HashingError)?
        .to_string();

    Ok(hashed_password)
}

/// Verify a password against a stored PHC-format hash
///
/// The salt and parameters are parsed back out of the stored string and
/// the candidate password is hashed with them; comparison happens in
/// constant time inside the argon2 crate.
///
/// Returns `Ok(false)` for a wrong password, `Err` only for invalid input
/// or an unparseable stored hash.
pub fn compare(password: &str, hashed_password: &str) -> Result<bool, ErrorMessage> {
    if password.is_empty() {
        return Err(ErrorMessage::EmptyPassword);
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ErrorMessage::ExceededMaxPasswordLength(MAX_PASSWORD_LENGTH));
    }

    let parsed_hash =
        PasswordHash::new(hashed_password).map_err(|_| ErrorMessage::InvalidHashFormat)?;

    let password_matched = Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_or(false, |_| true);

    Ok(password_matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_compare_roundtrip() {
        let hashed = hash("correct horse battery").unwrap();
        assert!(compare("correct horse battery", &hashed).unwrap());
        assert!(!compare("wrong password", &hashed).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let first = hash("repeatable").unwrap();
        let second = hash("repeatable").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn empty_password_is_rejected() {
        assert_eq!(hash("").unwrap_err(), ErrorMessage::EmptyPassword);
        assert_eq!(
            compare("", "$argon2id$whatever").unwrap_err(),
            ErrorMessage::EmptyPassword
        );
    }

    #[test]
    fn overlong_password_is_rejected() {
        let long = "a".repeat(MAX_PASSWORD_LENGTH + 1);
        assert_eq!(
            hash(long.clone()).unwrap_err(),
            ErrorMessage::ExceededMaxPasswordLength(MAX_PASSWORD_LENGTH)
        );
        assert_eq!(
            compare(&long, "$argon2id$whatever").unwrap_err(),
            ErrorMessage::ExceededMaxPasswordLength(MAX_PASSWORD_LENGTH)
        );
    }

    #[test]
    fn garbage_hash_is_invalid_format() {
        assert_eq!(
            compare("password", "not-a-phc-string").unwrap_err(),
            ErrorMessage::InvalidHashFormat
        );
    }
}
