//! Input bound checks applied before any command does work.

use thiserror::Error;

/// A user input violated a declared bound.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Text longer than allowed.
    #[error("`{field}` must be at most {max} characters (got {actual})")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    /// Text empty after trimming.
    #[error("`{field}` must not be empty")]
    Empty { field: String },

    /// Number outside an inclusive range.
    #[error("`{field}` must be between {min} and {max} (got {actual})")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    /// Text tries to ping `@everyone` or `@here`.
    #[error("`{field}` must not mention @everyone or @here")]
    MassMention { field: String },
}

/// Rejects empty text and text longer than `max` characters.
pub fn validate_length(field: &str, text: &str, max: usize) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::Empty {
            field: field.to_string(),
        });
    }

    let actual = text.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
            actual,
        });
    }

    Ok(())
}

/// Rejects values outside `min..=max`.
pub fn validate_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min,
            max,
            actual: value,
        });
    }
    Ok(())
}

/// Rejects text containing a mass mention.
pub fn reject_mass_mentions(field: &str, text: &str) -> Result<(), ValidationError> {
    if text.contains("@everyone") || text.contains("@here") {
        return Err(ValidationError::MassMention {
            field: field.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_at_bound_passes() {
        let text = "a".repeat(230);
        assert!(validate_length("question", &text, 230).is_ok());
    }

    #[test]
    fn test_length_over_bound_names_it() {
        let text = "a".repeat(231);
        let err = validate_length("question", &text, 230).unwrap_err();

        assert_eq!(
            err,
            ValidationError::TooLong {
                field: "question".to_string(),
                max: 230,
                actual: 231,
            }
        );
        assert_eq!(
            err.to_string(),
            "`question` must be at most 230 characters (got 231)"
        );
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        let text = "é".repeat(230);
        assert!(validate_length("question", &text, 230).is_ok());
    }

    #[test]
    fn test_blank_text_rejected() {
        assert!(matches!(
            validate_length("text", "   ", 10),
            Err(ValidationError::Empty { .. })
        ));
    }

    #[test]
    fn test_range() {
        assert!(validate_range("amount", 1, 1, 100).is_ok());
        assert!(validate_range("amount", 100, 1, 100).is_ok());
        assert!(validate_range("amount", 0, 1, 100).is_err());

        let err = validate_range("amount", 150, 1, 100).unwrap_err();
        assert_eq!(err.to_string(), "`amount` must be between 1 and 100 (got 150)");
    }

    #[test]
    fn test_mass_mentions() {
        assert!(reject_mass_mentions("text", "hello @everyone").is_err());
        assert!(reject_mass_mentions("text", "@here now").is_err());
        assert!(reject_mass_mentions("text", "mail me at a@b.c").is_ok());
    }
}
