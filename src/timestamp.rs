//! Date-time handling shared by the database layer and the request parsers.
//!
//! All stored date-times are UTC with whole-second precision in the years
//! 0001 to 9999. They are written as fixed-width text, e.g.
//! "2025-01-31T23:59:59Z", so comparing the text in SQL gives the same order as
//! comparing the instants.

use std::ops::RangeInclusive;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use time::{
    Date, Duration, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::{format_description, time},
};

/// Storage format, e.g. "2021-01-01T00:00:00Z".
const DB_DATE_TIME_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

const CALENDAR_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The last second of a day, used when a calendar date closes a range.
const END_OF_DAY: Time = time!(23:59:59);

/// The UTC years that keep the stored text four digits wide.
const SUPPORTED_YEARS: RangeInclusive<i32> = 1..=9999;

/// Convert `date_time` to UTC and drop the sub-second part.
pub fn normalize(date_time: OffsetDateTime) -> OffsetDateTime {
    let utc = date_time.to_offset(UtcOffset::UTC);

    utc - Duration::nanoseconds(utc.nanosecond() as i64)
}

/// Which end of an inclusive range a bare calendar date stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Midnight at the start of the day.
    Start,
    /// The last second of the day.
    End,
}

/// Parse a date-time from a request.
///
/// Accepts a full RFC 3339 date-time or a calendar date (`YYYY-MM-DD`). A
/// calendar date is read as UTC and placed at the start or end of the day
/// according to `bound`. Returns `None` if `text` is in neither format, or if
/// the instant falls outside the years 0001 to 9999 in UTC.
pub fn parse_date_time(text: &str, bound: Bound) -> Option<OffsetDateTime> {
    let text = text.trim();

    let date_time = match OffsetDateTime::parse(text, &Rfc3339) {
        Ok(date_time) => date_time.checked_to_offset(UtcOffset::UTC)?,
        Err(_) => at_bound(Date::parse(text, CALENDAR_DATE_FORMAT).ok()?, bound),
    };

    SUPPORTED_YEARS
        .contains(&date_time.year())
        .then(|| normalize(date_time))
}

/// The UTC date-time for the start or end of `date`.
pub fn at_bound(date: Date, bound: Bound) -> OffsetDateTime {
    let time = match bound {
        Bound::Start => Time::MIDNIGHT,
        Bound::End => END_OF_DAY,
    };

    PrimitiveDateTime::new(date, time).assume_utc()
}

/// A date-time as it is stored in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbDateTime(pub OffsetDateTime);

impl ToSql for DbDateTime {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let text = normalize(self.0)
            .format(DB_DATE_TIME_FORMAT)
            .map_err(|error| rusqlite::Error::ToSqlConversionFailure(Box::new(error)))?;

        Ok(ToSqlOutput::from(text))
    }
}

impl FromSql for DbDateTime {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        PrimitiveDateTime::parse(text, DB_DATE_TIME_FORMAT)
            .map(|date_time| DbDateTime(date_time.assume_utc()))
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}
