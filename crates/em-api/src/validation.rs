use chrono::NaiveDate;

use crate::error::ApiError;

/// Furthest ahead an exam may be scheduled, in days.
///
/// Well past the scheduler's own window bound; this only rejects obviously
/// wrong input like a typo'd year.
const MAX_EXAM_HORIZON_DAYS: i64 = 730;

/// Validate a submitted exam date against the current calendar day.
pub fn validate_exam_date(exam_date: NaiveDate, today: NaiveDate) -> Result<(), ApiError> {
    if exam_date < today {
        return Err(ApiError::Validation(
            "exam date must not be in the past".to_string(),
        ));
    }

    if (exam_date - today).num_days() > MAX_EXAM_HORIZON_DAYS {
        return Err(ApiError::Validation(format!(
            "exam date is more than {MAX_EXAM_HORIZON_DAYS} days away"
        )));
    }

    Ok(())
}

/// Validate a task index against a module's task list.
pub fn validate_task_index(index: usize, task_count: usize) -> Result<(), ApiError> {
    if index >= task_count {
        return Err(ApiError::Validation(format!(
            "task index {index} out of range for a module with {task_count} tasks"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_exam_date() {
        let today = date(2024, 6, 1);

        assert!(validate_exam_date(date(2024, 6, 1), today).is_ok());
        assert!(validate_exam_date(date(2024, 9, 1), today).is_ok());

        assert!(validate_exam_date(date(2024, 5, 31), today).is_err());
        assert!(validate_exam_date(date(2030, 6, 1), today).is_err());
    }

    #[test]
    fn test_validate_task_index() {
        assert!(validate_task_index(0, 2).is_ok());
        assert!(validate_task_index(1, 2).is_ok());
        assert!(validate_task_index(2, 2).is_err());
        assert!(validate_task_index(0, 0).is_err());
    }
}
