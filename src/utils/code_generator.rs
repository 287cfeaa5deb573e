//! Short code generation and input validation utilities.
//!
//! Generated codes come from the OS random number generator; custom aliases
//! chosen by callers are checked against a small format whitelist.

use crate::error::AppError;
use base64::Engine as _;
use serde_json::json;

/// Length of random bytes before base64 encoding.
const CODE_LENGTH_BYTES: usize = 9;

const ALIAS_MIN_LEN: usize = 3;
const ALIAS_MAX_LEN: usize = 50;

/// Aliases that would shadow service routes.
const RESERVED_ALIASES: &[&str] = &["api", "health", "links", "admin"];

/// Generates a random URL-safe short code.
///
/// Encodes 9 bytes of OS entropy as base64url without padding, producing a
/// 12-character code (72 bits, so collisions are negligible).
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
pub fn generate_code() -> Result<String, AppError> {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        tracing::error!(error = %e, "OS random number generator failed");
        AppError::internal("Failed to generate short code", json!({}))
    })?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Validates a caller-chosen alias.
///
/// # Rules
///
/// - Length: 3-50 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot be a reserved route word
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_alias(alias: &str) -> Result<(), AppError> {
    if alias.len() < ALIAS_MIN_LEN || alias.len() > ALIAS_MAX_LEN {
        return Err(AppError::bad_request(
            "Custom alias must be 3-50 characters",
            json!({ "provided_length": alias.len() }),
        ));
    }

    if !alias
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::bad_request(
            "Custom alias can only contain letters, digits, hyphens and underscores",
            json!({ "alias": alias }),
        ));
    }

    if RESERVED_ALIASES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(alias))
    {
        return Err(AppError::bad_request(
            "This alias is reserved",
            json!({ "alias": alias }),
        ));
    }

    Ok(())
}

/// Validates a redirect target: must be an absolute `http` or `https` URL.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the URL cannot be parsed or uses another scheme.
pub fn validate_original_url(raw: &str) -> Result<(), AppError> {
    let parsed = url::Url::parse(raw).map_err(|e| {
        AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
    })?;

    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(()),
        scheme => Err(AppError::bad_request(
            "URL must use http or https",
            json!({ "scheme": scheme }),
        )),
    }
}
