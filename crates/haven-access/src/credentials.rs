//! Password-strength and MFA-code validation.
//!
//! The MFA check is a format-only placeholder for a real provider; it
//! never contacts anything. Password rules are evaluated independently,
//! without short-circuiting, so the caller gets one message per failing
//! rule.

use serde::Serialize;

/// Minimum password length.
const MIN_PASSWORD_LEN: usize = 12;

/// The accepted special-character set.
const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Number of digits in an MFA code.
const MFA_CODE_LEN: usize = 6;

/// Result of password validation: valid iff every rule passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Result of MFA code verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MfaVerification {
    pub is_valid: bool,
    pub error: Option<String>,
}

/// Validate a password against the five strength rules.
///
/// All rules are evaluated; `errors` carries exactly one message per
/// failing rule.
pub fn validate_password(password: &str) -> PasswordValidation {
    let mut errors = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one number".to_string());
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        errors.push("Password must contain at least one special character".to_string());
    }

    PasswordValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Verify the shape of an MFA code.
///
/// Placeholder boundary: a production deployment substitutes a real
/// TOTP/SMS provider here. Fails on empty user id, empty code, or a code
/// that is not exactly six ASCII digits.
pub fn verify_mfa(user_id: &str, code: &str) -> MfaVerification {
    let error = if user_id.is_empty() {
        Some("User ID is required".to_string())
    } else if code.is_empty() {
        Some("MFA code is required".to_string())
    } else if code.len() != MFA_CODE_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
        Some(format!("MFA code must be {MFA_CODE_LEN} digits"))
    } else {
        None
    };

    MfaVerification {
        is_valid: error.is_none(),
        error,
    }
}
