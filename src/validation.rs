use crate::error::{PrmError, PrmResult};

/// Validates that a string is not blank (empty or whitespace-only).
/// Returns the trimmed string on success.
pub fn non_blank(value: &str, field: &str) -> PrmResult<String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        Err(PrmError::BlankField {
            field: field.to_string(),
        })
    } else {
        Ok(trimmed)
    }
}

/// Validates that an integer is positive (> 0).
pub fn positive(value: i32, field: &str) -> PrmResult<i32> {
    if value <= 0 {
        Err(PrmError::NonPositive {
            field: field.to_string(),
        })
    } else {
        Ok(value)
    }
}

/// Validates that an amount of money is positive.
pub fn positive_amount(value: f64, field: &str) -> PrmResult<f64> {
    if value.is_nan() || value <= 0.0 {
        Err(PrmError::NonPositive {
            field: field.to_string(),
        })
    } else {
        Ok(value)
    }
}

/// Trims an optional string, returning None if blank.
pub fn trim_optional(value: Option<&str>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_blank_accepts_valid_string() {
        assert_eq!(non_blank("hello", "first_name").unwrap(), "hello");
    }

    #[test]
    fn non_blank_trims_whitespace() {
        assert_eq!(non_blank("  hello  ", "first_name").unwrap(), "hello");
    }

    #[test]
    fn non_blank_rejects_whitespace_only() {
        let err = non_blank("   ", "first_name").unwrap_err();
        assert_eq!(err.to_string(), "first_name cannot be blank");
    }

    #[test]
    fn positive_rejects_zero_and_negative() {
        assert!(positive(0, "frequency").is_err());
        assert!(positive(-3, "frequency").is_err());
        assert_eq!(positive(2, "frequency").unwrap(), 2);
    }

    #[test]
    fn positive_amount_rejects_nan() {
        assert!(positive_amount(f64::NAN, "amount").is_err());
        assert!(positive_amount(0.0, "amount").is_err());
        assert_eq!(positive_amount(12.5, "amount").unwrap(), 12.5);
    }

    #[test]
    fn trim_optional_returns_none_for_blank() {
        assert_eq!(trim_optional(Some("   ")), None);
        assert_eq!(trim_optional(None), None);
        assert_eq!(trim_optional(Some(" hi ")), Some("hi".to_string()));
    }
}
