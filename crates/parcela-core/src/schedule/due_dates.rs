use chrono::{Datelike, NaiveDate};

use crate::error::ParcelaError;
use crate::ParcelaResult;

/// Due days past this one cannot exist in every month.
const MAX_DUE_DAY: u32 = 28;

/// Generate the due date of every installment.
///
/// A request made on or before `due_day` is first billed on `due_day` of the
/// next month; a later request skips one month. Every following installment
/// falls on `due_day` of each subsequent month.
pub fn generate_due_dates(
    request_date: NaiveDate,
    installments: u32,
    due_day: u32,
) -> ParcelaResult<Vec<NaiveDate>> {
    if installments == 0 {
        return Err(ParcelaError::InvalidInput {
            field: "installments".into(),
            reason: "At least one installment is required".into(),
        });
    }
    if due_day == 0 || due_day > MAX_DUE_DAY {
        return Err(ParcelaError::InvalidInput {
            field: "due_day".into(),
            reason: format!("Due day must be between 1 and {MAX_DUE_DAY}"),
        });
    }

    let months_to_first = if request_date.day() <= due_day { 1 } else { 2 };
    let base = month_index(request_date) + months_to_first;

    (0..installments)
        .map(|i| date_at_month_index(base + i64::from(i), due_day))
        .collect()
}

/// Months elapsed since year 0, so that month arithmetic wraps years for free.
fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

fn date_at_month_index(index: i64, day: u32) -> ParcelaResult<NaiveDate> {
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    i32::try_from(year)
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, month, day))
        .ok_or_else(|| {
            ParcelaError::DateError(format!("no calendar date {year}-{month:02}-{day:02}"))
        })
}
