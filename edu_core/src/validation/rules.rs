use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref SLUG_REGEX: Regex = Regex::new(
        r"^[a-z0-9]+(?:-[a-z0-9]+)*$"
    ).unwrap();
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Lowercase words joined by single hyphens, e.g. `fraction-race`.
pub fn validate_slug(value: &str) -> Result<(), ValidationError> {
    if !SLUG_REGEX.is_match(value) {
        return Err(ValidationError::new("slug"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Alg101").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   \t").is_err());
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("fraction-race").is_ok());
        assert!(validate_slug("times-tables-2").is_ok());
        assert!(validate_slug("Fraction-Race").is_err());
        assert!(validate_slug("double--dash").is_err());
        assert!(validate_slug("-leading").is_err());
        assert!(validate_slug("").is_err());
    }
}
