//! Request validation utilities.
//!
//! Length limits are configurable and checked by the handlers through
//! [`ServiceLimits`](crate::service::ServiceLimits); everything here is
//! static.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

use crate::extract::UserType;

/// Characters allowed in names.
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9 _.,'-]+$").expect("valid name pattern"));

/// Characters allowed in descriptions and addresses.
static REMARK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s\w_.,\-;()/]*$").expect("valid remark pattern"));

pub fn validation_error(code: &'static str, message: &str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.to_string().into());
    error
}

/// Rejects empty and whitespace-only values.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(validation_error("blank", "must not be blank"));
    }
    Ok(())
}

/// Rejects blank names and names with characters outside the allowed set.
pub fn name_format(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    if !NAME_PATTERN.is_match(value) {
        return Err(validation_error(
            "name_format",
            "may only contain letters, digits, spaces and _ . , ' -",
        ));
    }
    Ok(())
}

/// Rejects login names with characters other than ASCII letters, digits
/// and `_ . -`.
pub fn username_format(value: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || "_.-".contains(c);
    if value.is_empty() || !value.chars().all(allowed) {
        return Err(validation_error(
            "username_format",
            "may only contain letters, digits and _ . -",
        ));
    }
    Ok(())
}

/// Rejects remarks with characters outside the allowed set.
pub fn remark_format(value: &str) -> Result<(), ValidationError> {
    if !REMARK_PATTERN.is_match(value) {
        return Err(validation_error(
            "remark_format",
            "may only contain letters, digits, whitespace and _ . , - ; ( ) /",
        ));
    }
    Ok(())
}

/// Accepts only the user types the authorizer knows.
pub fn user_type_name(value: &str) -> Result<(), ValidationError> {
    if !UserType::is_known(value) {
        return Err(validation_error(
            "user_type",
            "must be SYSTEM_ADMIN or PROJECT_USER",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert!(name_format("O'Brien Wedding, 2025").is_ok());
        assert!(name_format("gala_night-01.v2").is_ok());
        assert!(name_format("   ").is_err());
        assert!(name_format("").is_err());
        assert!(name_format("drop;table").is_err());
        assert!(name_format("<script>").is_err());
    }

    #[test]
    fn usernames() {
        assert!(username_format("dewi.s-01").is_ok());
        assert!(username_format("dewi s").is_err());
        assert!(username_format("").is_err());
    }

    #[test]
    fn remarks() {
        assert!(remark_format("").is_ok());
        assert!(remark_format("Jl. Merdeka 10 (rear), Jakarta/Pusat; floor 2").is_ok());
        assert!(remark_format("line one\nline two").is_ok());
        assert!(remark_format("quote ' is not allowed").is_err());
        assert!(remark_format("<b>").is_err());
    }

    #[test]
    fn user_types() {
        assert!(user_type_name("SYSTEM_ADMIN").is_ok());
        assert!(user_type_name("PROJECT_USER").is_ok());
        assert!(user_type_name("project_user").is_err());
        assert!(user_type_name("").is_err());
    }
}
