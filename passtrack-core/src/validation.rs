//! Reference number validation

use crate::error::{Result, TrackerError};

/// Normalize and validate a passport application reference number
///
/// Only surrounding whitespace is removed; the rest is submitted to the
/// portal as typed. Form encoding takes care of any reserved characters.
pub fn normalize_reference(reference: &str) -> Result<String> {
    let reference = reference.trim();

    if reference.is_empty() {
        return Err(TrackerError::InvalidReference(
            "reference number is empty".to_string(),
        ));
    }

    if reference.chars().any(char::is_control) {
        return Err(TrackerError::InvalidReference(reference.escape_debug().to_string()));
    }

    Ok(reference.to_string())
}
