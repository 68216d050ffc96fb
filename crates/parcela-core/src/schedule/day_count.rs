use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ParcelaError;
use crate::types::Days;
use crate::ParcelaResult;

/// Elapsed days per installment, in schedule order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCounts {
    /// Days since the previous due date (the request date for the first one).
    pub per_installment: Vec<Days>,
    /// Days since the request date.
    pub cumulative: Vec<Days>,
}

/// Convert due dates into per-installment and cumulative day counts.
pub fn accrue_days(request_date: NaiveDate, due_dates: &[NaiveDate]) -> ParcelaResult<DayCounts> {
    if due_dates.is_empty() {
        return Err(ParcelaError::InvalidInput {
            field: "due_dates".into(),
            reason: "At least one due date is required".into(),
        });
    }

    let mut per_installment = Vec::with_capacity(due_dates.len());
    let mut cumulative = Vec::with_capacity(due_dates.len());
    let mut previous = request_date;
    let mut running: Days = 0;

    for (i, due) in due_dates.iter().enumerate() {
        let days = (*due - previous).num_days();
        if days <= 0 {
            return Err(ParcelaError::DateError(format!(
                "installment {} due {} does not fall after {}",
                i + 1,
                due,
                previous
            )));
        }
        running += days;
        per_installment.push(days);
        cumulative.push(running);
        previous = *due;
    }

    Ok(DayCounts {
        per_installment,
        cumulative,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_gap_counts_from_request_date() {
        let counts = accrue_days(ymd(2024, 3, 5), &[ymd(2024, 4, 10)]).unwrap();
        // 26 days left in March + 10 in April
        assert_eq!(counts.per_installment, vec![36]);
        assert_eq!(counts.cumulative, vec![36]);
    }

    #[test]
    fn test_cumulative_is_running_sum() {
        let due = [ymd(2024, 2, 10), ymd(2024, 3, 10), ymd(2024, 4, 10)];
        let counts = accrue_days(ymd(2024, 1, 10), &due).unwrap();
        // 2024 is a leap year: February has 29 days
        assert_eq!(counts.per_installment, vec![31, 29, 31]);
        assert_eq!(counts.cumulative, vec![31, 60, 91]);
    }

    #[test]
    fn test_cumulative_strictly_increasing() {
        let due: Vec<NaiveDate> = (1..=12).map(|m| ymd(2025, m, 10)).collect();
        let counts = accrue_days(ymd(2024, 12, 3), &due).unwrap();
        assert!(counts.cumulative.windows(2).all(|w| w[0] < w[1]));
        let total: Days = counts.per_installment.iter().sum();
        assert_eq!(total, *counts.cumulative.last().unwrap());
    }

    #[test]
    fn test_due_date_before_request_rejected() {
        let err = accrue_days(ymd(2024, 5, 1), &[ymd(2024, 4, 10)]).unwrap_err();
        assert!(matches!(err, ParcelaError::DateError(_)));
    }

    #[test]
    fn test_empty_schedule_rejected() {
        assert!(accrue_days(ymd(2024, 5, 1), &[]).is_err());
    }
}
