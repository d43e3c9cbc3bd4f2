//! Common validation rules shared across request payloads and handlers.

use crate::error::AppError;

/// Returns the trimmed text when non-empty, otherwise a `Validation` error
/// naming the field. Used for mandatory free-text inputs such as rejection
/// reasons and resubmission notes.
pub fn require_non_blank(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(vec![format!(
            "{}: must not be blank",
            field
        )]));
    }
    Ok(trimmed.to_string())
}

/// Optional variant: `None` stays `None`, whitespace-only collapses to `None`.
pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_non_blank_rejects_empty_and_whitespace() {
        assert!(require_non_blank("reason", "").is_err());
        assert!(require_non_blank("reason", "   ").is_err());
    }

    #[test]
    fn require_non_blank_trims_valid_input() {
        let value = require_non_blank("reason", "  needs work  ").expect("valid");
        assert_eq!(value, "needs work");
    }

    #[test]
    fn normalize_optional_text_collapses_blank_to_none() {
        assert_eq!(normalize_optional_text(None), None);
        assert_eq!(normalize_optional_text(Some("   ".into())), None);
        assert_eq!(
            normalize_optional_text(Some("  keep  ".into())),
            Some("keep".into())
        );
    }
}
