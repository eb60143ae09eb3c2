use chrono::{DateTime, NaiveDate, Utc};

use crate::error::AppError;

/// Plan date ranges may be open on either side but must not run backwards
pub fn validate_date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), AppError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(AppError::validation(
            "end_date",
            "End date must not be before start date",
        )),
        _ => Ok(()),
    }
}

/// Appointment windows must have a positive duration
pub fn validate_time_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), AppError> {
    if end <= start {
        return Err(AppError::validation(
            "end_time",
            "End time must be after start time",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_date_range_validation() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        assert!(validate_date_range(Some(start), Some(end)).is_ok());
        assert!(validate_date_range(Some(start), None).is_ok());
        assert!(validate_date_range(None, Some(end)).is_ok());
        assert!(validate_date_range(Some(end), Some(start)).is_err());
    }

    #[test]
    fn test_time_range_validation() {
        let start = Utc::now();
        assert!(validate_time_range(start, start + Duration::minutes(45)).is_ok());
        assert!(validate_time_range(start, start).is_err());
        assert!(validate_time_range(start, start - Duration::minutes(5)).is_err());
    }
}
