//! Defines the core data models and database queries for transactions.

use std::{
    fmt::Display,
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::extract::FromRef;
use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{AppState, Clock, Error, UserId, timestamp::DbDateTime};

// ============================================================================
// MODELS
// ============================================================================

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. a salary payment.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// The name used in JSON and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(format!("unknown transaction type \"{other}\"")),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// The part of the user's life a transaction belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Division {
    /// Private spending and earning.
    #[default]
    Personal,
    /// Work related spending and earning.
    Office,
}

impl Division {
    /// The name used in JSON and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Office => "office",
        }
    }
}

impl FromStr for Division {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(Self::Personal),
            "office" => Ok(Self::Office),
            other => Err(format!("unknown division \"{other}\"")),
        }
    }
}

impl Display for Division {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for Division {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Division {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether this is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The amount of money spent or earned. Never negative.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The category of the transaction in lowercase, e.g. "groceries".
    pub category: String,
    /// Whether the transaction is personal or work related.
    pub division: Division,
    /// The user that owns the transaction.
    pub user_id: UserId,
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        kind: TransactionType,
        amount: f64,
        description: &str,
        category: &str,
    ) -> TransactionBuilder {
        TransactionBuilder {
            kind,
            amount,
            description: description.trim().to_owned(),
            category: category.trim().to_lowercase(),
            division: Division::default(),
            date: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// # Examples
///
/// ```ignore
/// use time::macros::datetime;
///
/// use crate::transaction::{Division, Transaction, TransactionType, create_transaction};
///
/// let builder = Transaction::build(TransactionType::Expense, 45.99, "Lunch", "Food")
///     .division(Division::Office)
///     .date(datetime!(2025-01-15 12:30 UTC));
/// let transaction = create_transaction(builder, "user-1", now, &connection)?;
///
/// assert_eq!(transaction.category, "food");
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// Whether this is income or an expense.
    pub kind: TransactionType,

    /// The amount of money that moved. Must not be negative.
    pub amount: f64,

    /// A human-readable description of the transaction.
    pub description: String,

    /// The category of the transaction.
    ///
    /// [Transaction::build] trims and lowercases the category so that
    /// "Food", "food" and " FOOD " all end up in the same bucket.
    pub category: String,

    /// Defaults to [Division::Personal].
    pub division: Division,

    /// When the transaction happened.
    ///
    /// When `None`, the time the transaction is recorded is used.
    pub date: Option<OffsetDateTime>,
}

impl TransactionBuilder {
    /// Set the division for the transaction.
    pub fn division(mut self, division: Division) -> Self {
        self.division = division;
        self
    }

    /// Set when the transaction happened.
    pub fn date(mut self, date: OffsetDateTime) -> Self {
        self.date = Some(date);
        self
    }
}

/// The state needed to work with transactions.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The source of the current time, used for default dates and the edit window.
    pub clock: Clock,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            clock: state.clock.clone(),
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns read by [map_transaction_row], in order.
pub(super) const TRANSACTION_COLUMNS: &str =
    "id, type, amount, description, category, division, user_id, date, created_at, updated_at";

/// Create a new transaction for `user_id` in the database from a builder.
///
/// `now` is used for the creation and update times, and for the date if the
/// builder does not set one.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error,
/// e.g. a negative amount.
pub fn create_transaction(
    builder: TransactionBuilder,
    user_id: &str,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let date = builder.date.unwrap_or(now);

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\"
                (type, amount, description, category, division, user_id, date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                builder.kind,
                builder.amount,
                builder.description,
                builder.category,
                builder.division,
                user_id,
                DbDateTime(date),
                DbDateTime(now),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve the transaction with `id` that belongs to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::TransactionNotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: &str,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = ?1 AND user_id = ?2"
        ))?
        .query_row((id, user_id), map_transaction_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::TransactionNotFound,
            error => error.into(),
        })
}

/// Overwrite the transaction with `id` that belongs to `user_id`.
///
/// The date is only changed if `changes` sets one.
///
/// # Errors
/// This function will return a:
/// - [Error::TransactionNotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    user_id: &str,
    changes: TransactionBuilder,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "UPDATE \"transaction\"
             SET type = ?1,
                 amount = ?2,
                 description = ?3,
                 category = ?4,
                 division = ?5,
                 date = COALESCE(?6, date),
                 updated_at = ?7
             WHERE id = ?8 AND user_id = ?9
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                changes.kind,
                changes.amount,
                changes.description,
                changes.category,
                changes.division,
                changes.date.map(DbDateTime),
                DbDateTime(now),
                id,
                user_id,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::TransactionNotFound,
            error => error.into(),
        })
}

/// Delete the transaction with `id` that belongs to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::TransactionNotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: &str,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::TransactionNotFound);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                amount REAL NOT NULL CHECK (amount >= 0),
                description TEXT NOT NULL CHECK (length(trim(description)) > 0),
                category TEXT NOT NULL CHECK (length(trim(category)) > 0 AND category = lower(category)),
                division TEXT NOT NULL CHECK (division IN ('personal', 'office')),
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    // Every query is scoped to one user and most are ordered or filtered by date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// The row must have the columns listed in [TRANSACTION_COLUMNS].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let kind = row.get(1)?;
    let amount = row.get(2)?;
    let description = row.get(3)?;
    let category = row.get(4)?;
    let division = row.get(5)?;
    let user_id = row.get(6)?;
    let DbDateTime(date) = row.get(7)?;
    let DbDateTime(created_at) = row.get(8)?;
    let DbDateTime(updated_at) = row.get(9)?;

    Ok(Transaction {
        id,
        kind,
        amount,
        description,
        category,
        division,
        user_id,
        date,
        created_at,
        updated_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================
