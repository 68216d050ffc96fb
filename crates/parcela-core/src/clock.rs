//! Request-date helpers.
//!
//! Brazil has not observed daylight saving since 2019, so São Paulo civil
//! time is a fixed UTC−03:00.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

use crate::error::ParcelaError;
use crate::ParcelaResult;

/// Seconds west of UTC.
pub const SAO_PAULO_UTC_OFFSET_WEST_SECS: i32 = 3 * 3600;

pub fn sao_paulo_offset() -> FixedOffset {
    FixedOffset::west_opt(SAO_PAULO_UTC_OFFSET_WEST_SECS).unwrap_or_else(|| Utc.fix())
}

/// Calendar date in São Paulo at the given instant.
pub fn date_in_sao_paulo(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&sao_paulo_offset()).date_naive()
}

pub fn today_in_sao_paulo() -> NaiveDate {
    date_in_sao_paulo(Utc::now())
}

/// Parse a request date written as `dd/mm/yyyy` or ISO `yyyy-mm-dd`.
pub fn parse_request_date(raw: &str) -> ParcelaResult<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map_err(|e| ParcelaError::DateError(format!("'{raw}' is not a valid date: {e}")))
}
