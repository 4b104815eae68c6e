//! Short code generation and validation.

use crate::error::AppError;
use base64::Engine as _;
use serde_json::json;

/// Random bytes per generated code; 6 bytes encode to 8 base64 characters.
const CODE_LENGTH_BYTES: usize = 6;

const MIN_CUSTOM_LEN: usize = 4;
const MAX_CUSTOM_LEN: usize = 32;

/// Codes that would shadow a top-level route.
const RESERVED_CODES: &[&str] = &["api", "health"];

/// Generates a random 8-character URL-safe short code.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the OS random source is unavailable.
pub fn generate_code() -> Result<String, AppError> {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate short code",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Validates a caller-chosen short code.
///
/// Accepts 4 to 32 ASCII letters, digits, `-` or `_`, excluding reserved
/// route names.
///
/// # Errors
///
/// Returns [`AppError::Validation`] describing the first violated rule.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if !(MIN_CUSTOM_LEN..=MAX_CUSTOM_LEN).contains(&code.len()) {
        return Err(AppError::bad_request(
            format!("Custom code must be {MIN_CUSTOM_LEN}-{MAX_CUSTOM_LEN} characters"),
            json!({ "provided_length": code.len() }),
        ));
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::bad_request(
            "Custom code can only contain letters, digits, '-' and '_'",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES.contains(&code.to_ascii_lowercase().as_str()) {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_code_shape() {
        let code = generate_code().unwrap();

        assert_eq!(code.len(), 8);
        assert!(
            code.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_generated_codes_are_distinct() {
        let codes: HashSet<String> = (0..500).map(|_| generate_code().unwrap()).collect();
        assert_eq!(codes.len(), 500);
    }

    #[test]
    fn test_generated_code_passes_custom_validation() {
        let code = generate_code().unwrap();
        assert!(validate_custom_code(&code).is_ok());
    }

    #[test]
    fn test_validate_accepts_valid_codes() {
        for code in ["abcd", "My_Link-2025", "x".repeat(32).as_str()] {
            assert!(validate_custom_code(code).is_ok(), "{code} should be valid");
        }
    }

    #[test]
    fn test_validate_rejects_bad_length() {
        let err = validate_custom_code("abc").unwrap_err();
        assert!(err.to_string().contains("4-32"));

        assert!(validate_custom_code(&"y".repeat(33)).is_err());
        assert!(validate_custom_code("").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_characters() {
        assert!(validate_custom_code("with space").is_err());
        assert!(validate_custom_code("slash/code").is_err());
        assert!(validate_custom_code("caf\u{e9}-link").is_err());
    }

    #[test]
    fn test_validate_rejects_reserved_codes_case_insensitively() {
        assert!(validate_custom_code("health").is_err());
        assert!(validate_custom_code("HEALTH").is_err());
        assert!(validate_custom_code("api").is_err());
    }
}
