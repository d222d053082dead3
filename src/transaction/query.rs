//! Database queries and query-string parsing for listing a user's transactions.

use rusqlite::{Connection, ToSql, params_from_iter};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    Error,
    timestamp::{Bound, DbDateTime, at_bound, parse_date_time},
    transaction::{
        Division, Transaction, TransactionType,
        core::{TRANSACTION_COLUMNS, map_transaction_row},
        period::{Period, compute_range},
    },
    validation::Validator,
};

/// An inclusive range of date-times. A missing bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateTimeRange {
    pub start: Option<OffsetDateTime>,
    pub end: Option<OffsetDateTime>,
}

/// Restricts which transactions are returned by [query_transactions].
///
/// Every field that is set must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    /// Compared with the stored category, which is always lowercase.
    pub category: Option<String>,
    pub division: Option<Division>,
    pub range: DateTimeRange,
}

/// Get the transactions of `user_id` that match `filter`, newest first.
///
/// Transactions with the same date are ordered by ID, highest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn query_transactions(
    user_id: &str,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let start = filter.range.start.map(DbDateTime);
    let end = filter.range.end.map(DbDateTime);

    let mut conditions = vec!["user_id = ?"];
    let mut params: Vec<&dyn ToSql> = vec![&user_id];

    if let Some(kind) = &filter.kind {
        conditions.push("type = ?");
        params.push(kind);
    }

    if let Some(category) = &filter.category {
        conditions.push("category = ?");
        params.push(category);
    }

    if let Some(division) = &filter.division {
        conditions.push("division = ?");
        params.push(division);
    }

    if let Some(start) = &start {
        conditions.push("date >= ?");
        params.push(start);
    }

    if let Some(end) = &end {
        conditions.push("date <= ?");
        params.push(end);
    }

    let query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE {} ORDER BY date DESC, id DESC",
        conditions.join(" AND ")
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// The query string accepted by the filter endpoint.
///
/// Values are kept as text so that a bad value is reported as a validation
/// error on its field instead of rejecting the whole query string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    pub division: Option<String>,
    #[serde(flatten)]
    pub range: RangeQuery,
}

/// The date range part of a query string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// A calendar period around now, used when neither date is given.
    pub period: Option<String>,
}

impl FilterQuery {
    /// Check every field and turn the query into a [TransactionFilter].
    ///
    /// # Errors
    /// Returns [Error::Validation] listing every field that could not be parsed.
    pub fn parse(&self, now: OffsetDateTime) -> Result<TransactionFilter, Error> {
        let mut validator = Validator::new();

        let kind = validator.optional_choice(
            "type",
            self.kind.as_deref(),
            "Type must be income or expense",
        );
        let division = validator.optional_choice(
            "division",
            self.division.as_deref(),
            "Division must be personal or office",
        );
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .map(str::to_lowercase);
        let range = self.range.resolve(&mut validator, now);

        validator.finish()?;

        Ok(TransactionFilter {
            kind,
            category,
            division,
            range,
        })
    }
}

impl RangeQuery {
    /// Check the dates and turn them into a [DateTimeRange].
    ///
    /// Explicit dates win over `period`. When neither is given the range is
    /// open on both sides.
    ///
    /// # Errors
    /// Returns [Error::Validation] if a date or the period is malformed, or if
    /// the end is before the start.
    pub fn parse(&self, now: OffsetDateTime) -> Result<DateTimeRange, Error> {
        let mut validator = Validator::new();
        let range = self.resolve(&mut validator, now);
        validator.finish()?;

        Ok(range)
    }

    /// Like [RangeQuery::parse], but both dates must be given.
    ///
    /// # Errors
    /// Returns [Error::Validation] if either date is missing or malformed, or
    /// if the end is before the start.
    pub fn parse_required(&self, now: OffsetDateTime) -> Result<DateTimeRange, Error> {
        let mut validator = Validator::new();

        for (field, value) in [("startDate", &self.start_date), ("endDate", &self.end_date)] {
            if is_blank(value.as_deref()) {
                validator.add(field, "Start date and end date are required");
            }
        }

        let range = self.resolve(&mut validator, now);
        validator.finish()?;

        Ok(range)
    }

    fn resolve(&self, validator: &mut Validator, now: OffsetDateTime) -> DateTimeRange {
        let start_date = non_blank(self.start_date.as_deref());
        let end_date = non_blank(self.end_date.as_deref());

        if start_date.is_none() && end_date.is_none() {
            return match non_blank(self.period.as_deref()) {
                Some(period) => self.resolve_period(validator, period, now),
                None => DateTimeRange::default(),
            };
        }

        let start = start_date.and_then(|text| {
            let parsed = parse_date_time(text, Bound::Start);
            if parsed.is_none() {
                validator.add("startDate", "Invalid date format");
            }
            parsed
        });
        let end = end_date.and_then(|text| {
            let parsed = parse_date_time(text, Bound::End);
            if parsed.is_none() {
                validator.add("endDate", "Invalid date format");
            }
            parsed
        });

        if let (Some(start), Some(end)) = (start, end)
            && end < start
        {
            validator.add("endDate", "End date must not be before start date");
        }

        DateTimeRange { start, end }
    }

    fn resolve_period(
        &self,
        validator: &mut Validator,
        period: &str,
        now: OffsetDateTime,
    ) -> DateTimeRange {
        let Some(period) = validator.required_choice::<Period>(
            "period",
            Some(period),
            "Period must be weekly, monthly or yearly",
        ) else {
            return DateTimeRange::default();
        };

        let days = compute_range(period, now.date());

        DateTimeRange {
            start: Some(at_bound(days.start, Bound::Start)),
            end: Some(at_bound(days.end, Bound::End)),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

fn is_blank(value: Option<&str>) -> bool {
    non_blank(value).is_none()
}


#[cfg(test)]
mod parse_tests {
    use time::macros::datetime;

    use crate::{
        Error,
        transaction::{
            Division, TransactionType,
            query::{DateTimeRange, FilterQuery, RangeQuery, TransactionFilter},
        },
        validation::FieldError,
    };

    // A Wednesday.
    const NOW: time::OffsetDateTime = datetime!(2025-10-15 08:30:00 UTC);

    fn fields(error: Error) -> Vec<String> {
        match error {
            Error::Validation(errors) => errors
                .into_iter()
                .map(|FieldError { field, .. }| field)
                .collect(),
            other => panic!("want validation error, got {other:?}"),
        }
    }

    #[test]
    fn empty_query_matches_everything() {
        let got = FilterQuery::default().parse(NOW).unwrap();

        assert_eq!(got, TransactionFilter::default());
    }

    #[test]
    fn out_of_range_dates_are_field_errors() {
        let query = RangeQuery {
            start_date: Some("0000-01-01T00:00:00+01:00".to_owned()),
            end_date: Some("9999-12-31T23:00:00-02:00".to_owned()),
            period: None,
        };

        let got = query.parse_required(NOW).unwrap_err();

        assert_eq!(fields(got), ["startDate", "endDate"]);
    }

    #[test]
    fn parses_all_fields() {
        let query = FilterQuery {
            kind: Some("expense".to_owned()),
            category: Some(" Food ".to_owned()),
            division: Some("office".to_owned()),
            range: RangeQuery {
                start_date: Some("2025-10-01".to_owned()),
                end_date: Some("2025-10-31T12:00:00+02:00".to_owned()),
                period: None,
            },
        };

        let got = query.parse(NOW).unwrap();

        assert_eq!(
            got,
            TransactionFilter {
                kind: Some(TransactionType::Expense),
                category: Some("food".to_owned()),
                division: Some(Division::Office),
                range: DateTimeRange {
                    start: Some(datetime!(2025-10-01 00:00:00 UTC)),
                    end: Some(datetime!(2025-10-31 10:00:00 UTC)),
                },
            }
        );
    }

    #[test]
    fn reports_every_bad_field() {
        let query = FilterQuery {
            kind: Some("gift".to_owned()),
            category: None,
            division: Some("home".to_owned()),
            range: RangeQuery {
                start_date: Some("last tuesday".to_owned()),
                end_date: None,
                period: None,
            },
        };

        let got = query.parse(NOW).unwrap_err();

        assert_eq!(fields(got), ["type", "division", "startDate"]);
    }

    #[test]
    fn end_before_start_is_an_error() {
        let query = RangeQuery {
            start_date: Some("2025-10-02".to_owned()),
            end_date: Some("2025-10-01".to_owned()),
            period: None,
        };

        assert_eq!(fields(query.parse(NOW).unwrap_err()), ["endDate"]);
    }

    #[test]
    fn same_calendar_day_covers_whole_day() {
        let query = RangeQuery {
            start_date: Some("2025-10-01".to_owned()),
            end_date: Some("2025-10-01".to_owned()),
            period: None,
        };

        assert_eq!(
            query.parse(NOW),
            Ok(DateTimeRange {
                start: Some(datetime!(2025-10-01 00:00:00 UTC)),
                end: Some(datetime!(2025-10-01 23:59:59 UTC)),
            })
        );
    }

    #[test]
    fn period_covers_the_current_week() {
        let query = RangeQuery {
            period: Some("weekly".to_owned()),
            ..Default::default()
        };

        assert_eq!(
            query.parse(NOW),
            Ok(DateTimeRange {
                start: Some(datetime!(2025-10-13 00:00:00 UTC)),
                end: Some(datetime!(2025-10-19 23:59:59 UTC)),
            })
        );
    }

    #[test]
    fn explicit_dates_win_over_period() {
        let query = RangeQuery {
            start_date: Some("2025-01-01".to_owned()),
            end_date: None,
            period: Some("yearly".to_owned()),
        };

        assert_eq!(
            query.parse(NOW),
            Ok(DateTimeRange {
                start: Some(datetime!(2025-01-01 00:00:00 UTC)),
                end: None,
            })
        );
    }

    #[test]
    fn unknown_period_is_an_error() {
        let query = RangeQuery {
            period: Some("daily".to_owned()),
            ..Default::default()
        };

        assert_eq!(fields(query.parse(NOW).unwrap_err()), ["period"]);
    }

    #[test]
    fn required_range_needs_both_dates() {
        let query = RangeQuery {
            start_date: Some("2025-10-01".to_owned()),
            end_date: None,
            period: None,
        };

        assert_eq!(fields(query.parse_required(NOW).unwrap_err()), ["endDate"]);
        assert_eq!(
            fields(RangeQuery::default().parse_required(NOW).unwrap_err()),
            ["startDate", "endDate"]
        );
    }
}
