//! Calendar period presets for filtering and summarising transactions.

use std::str::FromStr;

use time::{Date, Duration, Month, util};

/// A calendar period that contains a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Monday to Sunday.
    Weekly,
    /// The first to the last day of a month.
    Monthly,
    /// January 1st to December 31st.
    Yearly,
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(format!("unknown period \"{other}\"")),
        }
    }
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

/// The days of the `period` that contains `anchor_date`.
pub fn compute_range(period: Period, anchor_date: Date) -> DateRange {
    match period {
        Period::Weekly => week_bounds(anchor_date),
        Period::Monthly => month_bounds(anchor_date),
        Period::Yearly => year_bounds(anchor_date),
    }
}

fn week_bounds(anchor_date: Date) -> DateRange {
    let weekday_number = anchor_date.weekday().number_from_monday() as i64;
    let start = anchor_date - Duration::days(weekday_number - 1);
    let end = start + Duration::days(6);

    DateRange { start, end }
}

fn month_bounds(anchor_date: Date) -> DateRange {
    let start = anchor_date - Duration::days(anchor_date.day() as i64 - 1);
    let length = last_day_of_month(anchor_date.year(), anchor_date.month()) as i64;
    let end = start + Duration::days(length - 1);

    DateRange { start, end }
}

fn year_bounds(anchor_date: Date) -> DateRange {
    let start = anchor_date - Duration::days(anchor_date.ordinal() as i64 - 1);
    let end = start + Duration::days(util::days_in_year(anchor_date.year()) as i64 - 1);

    DateRange { start, end }
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if util::is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}
