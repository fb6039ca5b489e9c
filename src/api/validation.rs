use super::ApiError;
use crate::db::repositories::title::DEFAULT_LIMIT;

pub const MIN_RELEASE_YEAR: i32 = 1888;
pub const MAX_RELEASE_YEAR: i32 = 2100;

pub fn validate_limit(limit: u64) -> Result<u64, ApiError> {
    const MAX_LIMIT: u64 = 1000;
    const MIN_LIMIT: u64 = 1;

    if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {}. Limit must be between {} and {}",
            limit, MIN_LIMIT, MAX_LIMIT
        )));
    }
    Ok(limit)
}

/// Applies the default page size when `limit` is absent.
pub fn page_limit(limit: Option<u64>) -> Result<u64, ApiError> {
    validate_limit(limit.unwrap_or(DEFAULT_LIMIT))
}

pub fn validate_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_release_year(year: i32) -> Result<i32, ApiError> {
    if !(MIN_RELEASE_YEAR..=MAX_RELEASE_YEAR).contains(&year) {
        return Err(ApiError::validation(format!(
            "Invalid release_year: {}. Must be between {} and {}",
            year, MIN_RELEASE_YEAR, MAX_RELEASE_YEAR
        )));
    }
    Ok(year)
}

/// Trims `value` and checks its length in characters.
pub fn validate_length<'a>(
    field: &str,
    value: &'a str,
    min: usize,
    max: usize,
) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < min || len > max {
        return Err(ApiError::validation(format!(
            "{} must be between {} and {} characters",
            field, min, max
        )));
    }
    Ok(trimmed)
}

pub fn validate_required<'a>(field: &str, value: &'a str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{} cannot be empty", field)));
    }
    Ok(trimmed)
}

pub fn validate_non_negative(field: &str, value: i32) -> Result<i32, ApiError> {
    if value < 0 {
        return Err(ApiError::validation(format!(
            "{} must be zero or greater",
            field
        )));
    }
    Ok(value)
}

pub fn validate_score(field: &str, score: f64) -> Result<f64, ApiError> {
    if !(0.0..=10.0).contains(&score) {
        return Err(ApiError::validation(format!(
            "{} must be between 0 and 10",
            field
        )));
    }
    Ok(score)
}

pub fn validate_votes(votes: i64) -> Result<i64, ApiError> {
    if votes < 0 {
        return Err(ApiError::validation("votes must be zero or greater"));
    }
    Ok(votes)
}

/// Validates an optional text filter, returning the trimmed value.
pub fn optional_filter(
    field: &str,
    value: Option<&str>,
    min: usize,
    max: usize,
) -> Result<Option<String>, ApiError> {
    value
        .map(|v| validate_length(field, v, min, max).map(str::to_string))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_limit() {
        assert!(validate_limit(1).is_ok());
        assert!(validate_limit(100).is_ok());
        assert!(validate_limit(1000).is_ok());
        assert!(validate_limit(0).is_err());
        assert!(validate_limit(1001).is_err());
    }

    #[test]
    fn test_page_limit_defaults() {
        assert_eq!(page_limit(None).unwrap(), DEFAULT_LIMIT);
        assert_eq!(page_limit(Some(5)).unwrap(), 5);
        assert!(page_limit(Some(0)).is_err());
    }

    #[test]
    fn test_validate_release_year() {
        assert!(validate_release_year(1888).is_ok());
        assert!(validate_release_year(2100).is_ok());
        assert!(validate_release_year(1887).is_err());
        assert!(validate_release_year(2101).is_err());
    }

    #[test]
    fn test_validate_length() {
        assert_eq!(validate_length("title", "  Heat ", 3, 50).unwrap(), "Heat");
        assert!(validate_length("title", "Up", 3, 50).is_err());
        assert!(validate_length("title", &"x".repeat(51), 3, 50).is_err());
        assert!(validate_length("genre", "", 1, 20).is_err());
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("title", "Heat").is_ok());
        assert!(validate_required("title", "   ").is_err());
    }

    #[test]
    fn test_validate_score() {
        assert!(validate_score("score", 0.0).is_ok());
        assert!(validate_score("score", 10.0).is_ok());
        assert!(validate_score("score", -0.1).is_err());
        assert!(validate_score("score", 10.5).is_err());
        assert!(validate_score("score", f64::NAN).is_err());
    }

    #[test]
    fn test_optional_filter() {
        assert_eq!(optional_filter("genre", None, 1, 20).unwrap(), None);
        assert_eq!(
            optional_filter("genre", Some(" drama "), 1, 20).unwrap(),
            Some("drama".to_string())
        );
        assert!(optional_filter("country", Some("x".repeat(11).as_str()), 1, 10).is_err());
    }
}
