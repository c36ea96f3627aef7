//! Timestamp and calendar utilities

use chrono::{DateTime, Datelike, FixedOffset, Months, NaiveDate, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current calendar date at the given UTC offset
pub fn today_in(offset: FixedOffset) -> NaiveDate {
    now().with_timezone(&offset).date_naive()
}

/// Add whole calendar months, clamping to the last day of shorter months
///
/// Falls back to the input date only if the result would leave chrono's range.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}

/// First day of the calendar quarter containing `date`
pub fn quarter_start(date: NaiveDate) -> NaiveDate {
    let month = ((date.month0() / 3) * 3) + 1;
    NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
}

/// Quarter number (1-4) of `date`
pub fn quarter_of(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}
