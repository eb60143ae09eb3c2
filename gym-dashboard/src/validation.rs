use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Payloads that can be checked before they are sent
pub trait Validate {
    fn validate(&self) -> Vec<FieldError>;

    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

pub fn required(field: &str, value: &str) -> Option<FieldError> {
    value
        .trim()
        .is_empty()
        .then(|| FieldError::new(field, format!("{} is required", field)))
}

pub fn email(field: &str, value: &str) -> Option<FieldError> {
    (!EMAIL_PATTERN.is_match(value))
        .then(|| FieldError::new(field, "Please enter a valid email address"))
}

pub fn min_length(field: &str, value: &str, min: usize) -> Option<FieldError> {
    (value.chars().count() < min)
        .then(|| FieldError::new(field, format!("{} must be at least {} characters", field, min)))
}

pub fn max_length(field: &str, value: &str, max: usize) -> Option<FieldError> {
    (value.chars().count() > max)
        .then(|| FieldError::new(field, format!("{} must be at most {} characters", field, max)))
}

pub fn pattern(field: &str, value: &str, regex: &Regex, message: &str) -> Option<FieldError> {
    (!regex.is_match(value)).then(|| FieldError::new(field, message))
}

pub fn one_of(field: &str, value: &str, allowed: &[&str]) -> Option<FieldError> {
    (!allowed.contains(&value))
        .then(|| FieldError::new(field, format!("{} must be one of: {}", field, allowed.join(", "))))
}

pub fn numeric(field: &str, value: &str) -> Option<FieldError> {
    value
        .trim()
        .parse::<f64>()
        .is_err()
        .then(|| FieldError::new(field, format!("{} must be a number", field)))
}

pub fn range(field: &str, value: f64, min: f64, max: f64) -> Option<FieldError> {
    (value < min || value > max)
        .then(|| FieldError::new(field, format!("{} must be between {} and {}", field, min, max)))
}

/// Drops the passing checks
pub fn collect_errors<I>(checks: I) -> Vec<FieldError>
where
    I: IntoIterator<Item = Option<FieldError>>,
{
    checks.into_iter().flatten().collect()
}

pub fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| error.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_treats_whitespace_as_missing() {
        assert!(required("name", "  ").is_some());
        assert!(required("name", "Jo").is_none());
    }

    #[test]
    fn test_email_shape() {
        assert!(email("email", "john.doe@example.com").is_none());
        assert!(email("email", "john.doe@example").is_some());
        assert!(email("email", "john doe@example.com").is_some());
    }

    #[test]
    fn test_length_bounds_count_characters() {
        assert!(min_length("name", "Zoë", 3).is_none());
        assert!(max_length("name", "Zoë", 2).is_some());
    }

    #[test]
    fn test_pattern_uses_custom_message() {
        let digits = Regex::new(r"^\d+$").unwrap();
        let error = pattern("phone", "12a", &digits, "Digits only").unwrap();
        assert_eq!(error.message, "Digits only");
    }

    #[test]
    fn test_enum_and_numeric_checks() {
        assert!(one_of("level", "moderate", &["light", "moderate"]).is_none());
        assert_eq!(
            one_of("level", "extreme", &["light", "moderate"]).unwrap().message,
            "level must be one of: light, moderate"
        );
        assert!(numeric("weight", "72.5").is_none());
        assert!(numeric("weight", "heavy").is_some());
        assert!(range("rating", 6.0, 1.0, 5.0).is_some());
        assert!(range("rating", 5.0, 1.0, 5.0).is_none());
    }

    #[test]
    fn test_collect_and_join() {
        let errors = collect_errors([
            required("name", ""),
            None,
            range("rating", 0.0, 1.0, 5.0),
        ]);
        assert_eq!(errors.len(), 2);
        assert_eq!(
            join_messages(&errors),
            "name is required, rating must be between 1 and 5"
        );
    }
}
