//! Password hashing and strength rules.

use bcrypt::{DEFAULT_COST, hash, verify};
use validator::ValidationError;

use crate::errors::AppError;

/// Characters accepted as the required special character.
pub const PASSWORD_SPECIALS: &str = "@$!%*#?&";
pub const PASSWORD_MIN_LENGTH: usize = 8;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST).map_err(AppError::internal)
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    verify(password, hashed).map_err(AppError::internal)
}

/// Strength rule shared by registration, admin user creation and password
/// changes: at least 8 characters with a letter, a digit and one of
/// `@$!%*#?&`, and nothing outside those classes.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let mut has_letter = false;
    let mut has_digit = false;
    let mut has_special = false;

    for c in password.chars() {
        if c.is_ascii_alphabetic() {
            has_letter = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        } else if PASSWORD_SPECIALS.contains(c) {
            has_special = true;
        } else {
            return Err(weak_password());
        }
    }

    if password.chars().count() < PASSWORD_MIN_LENGTH || !(has_letter && has_digit && has_special)
    {
        return Err(weak_password());
    }

    Ok(())
}

fn weak_password() -> ValidationError {
    ValidationError::new("password_strength").with_message(
        "Password must be at least 8 characters long and include at least one letter, one number, and one special character (@$!%*#?&)"
            .into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hashed = hash_password("Secret123!").unwrap();
        assert_ne!(hashed, "Secret123!");
        assert!(verify_password("Secret123!", &hashed).unwrap());
        assert!(!verify_password("Secret124!", &hashed).unwrap());
    }

    #[test]
    fn verify_errors_on_garbage_hash() {
        assert!(verify_password("whatever", "not-a-bcrypt-hash").is_err());
    }

    #[test]
    fn strength_accepts_valid_passwords() {
        assert!(validate_password_strength("Passw0rd!").is_ok());
        assert!(validate_password_strength("a1@aaaaa").is_ok());
    }

    #[test]
    fn strength_rejects_weak_passwords() {
        for weak in [
            "short1!",      // too short
            "password!!",   // no digit
            "12345678!",    // no letter
            "password123",  // no special
            "pass word1!",  // space is not allowed
            "pässwörd1!",   // non-ascii letter
            "Password1^",   // special outside the allowed set
        ] {
            assert!(validate_password_strength(weak).is_err(), "{weak} accepted");
        }
    }

    #[test]
    fn strength_error_has_message() {
        let err = validate_password_strength("weak").unwrap_err();
        assert!(err.message.unwrap().contains("at least 8 characters"));
    }
}
