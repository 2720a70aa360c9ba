//! Validation utilities for business onboarding

use std::borrow::Cow;

use validator::ValidationError;

use crate::models::{MAX_BUSINESS_NAME_LEN, NAME_REQUIRED, NAME_TOO_LONG};

/// Validate a business name: present and at most 100 UTF-16 code units
pub fn validate_business_name(name: &str) -> Result<(), ValidationError> {
    check_business_name(name).map_err(|message| {
        let code = if message == NAME_REQUIRED {
            "required"
        } else {
            "length"
        };
        let mut error = ValidationError::new(code);
        error.message = Some(Cow::Borrowed(message));
        error
    })
}

/// Presence and length check shared by the server and the browser form.
/// Whitespace-only names count as missing. Length is measured in UTF-16
/// code units, the unit the browser's `maxlength` counts.
pub fn check_business_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err(NAME_REQUIRED);
    }
    if name.encode_utf16().count() > MAX_BUSINESS_NAME_LEN {
        return Err(NAME_TOO_LONG);
    }
    Ok(())
}
