//! Common validation utilities

/// Minimum accepted length of a secret, in characters
pub const SECRET_MIN_LENGTH: usize = 8;

/// Maximum accepted length of a secret, in characters
pub const SECRET_MAX_LENGTH: usize = 128;

/// Common validation functions
pub mod validators {
    /// Check if a string is not empty
    pub fn not_empty(value: &str) -> bool {
        !value.trim().is_empty()
    }

    /// Check if a string length (in characters) is within bounds
    pub fn length_between(value: &str, min: usize, max: usize) -> bool {
        let len = value.chars().count();
        len >= min && len <= max
    }

    /// Check if a string is exactly `len` ASCII digits
    pub fn is_numeric_code(value: &str, len: usize) -> bool {
        value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
    }
}

/// Check if a secret has an acceptable length
pub fn is_valid_secret_length(secret: &str) -> bool {
    validators::length_between(secret, SECRET_MIN_LENGTH, SECRET_MAX_LENGTH)
}
