//! Defines the account model and its database queries.

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

/// Database identifier for an account.
pub type AccountId = i64;

/// The currency used when an account is created without one.
pub const DEFAULT_CURRENCY: &str = "INR";

/// The kind of place money is kept in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// A savings account.
    #[default]
    Savings,
    /// A checking (current) account.
    Checking,
    /// Physical cash.
    Cash,
    /// A credit card or line of credit.
    Credit,
    /// An investment or brokerage account.
    Investment,
}

impl AccountType {
    /// The name used in JSON and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Savings => "savings",
            Self::Checking => "checking",
            Self::Cash => "cash",
            Self::Credit => "credit",
            Self::Investment => "investment",
        }
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "savings" => Ok(Self::Savings),
            "checking" => Ok(Self::Checking),
            "cash" => Ok(Self::Cash),
            "credit" => Ok(Self::Credit),
            "investment" => Ok(Self::Investment),
            other => Err(format!("unknown account type \"{other}\"")),
        }
    }
}

impl Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for AccountType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AccountType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// The amount of money available in a bank account, wallet or credit card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The display name of the account.
    pub name: String,
    /// What kind of account this is.
    #[serde(rename = "type")]
    pub kind: AccountType,
    /// The balance. Never negative.
    pub balance: f64,
    /// The currency code of the balance, e.g. "INR".
    pub currency: String,
    /// Optional notes about the account.
    pub description: Option<String>,
    /// The user that owns the account.
    pub user_id: UserId,
    /// When the account was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the account was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The client-controlled fields of an account.
///
/// When creating an account, a missing balance means zero and a missing
/// currency means [DEFAULT_CURRENCY]. When updating, they keep their current
/// values.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountDetails {
    /// The display name, already trimmed.
    pub name: String,
    /// What kind of account this is.
    pub kind: AccountType,
    /// The balance, if given. Must not be negative.
    pub balance: Option<f64>,
    /// The currency code, if given.
    pub currency: Option<String>,
    /// Optional notes about the account.
    pub description: Option<String>,
}

/// The state needed to work with accounts.
#[derive(Debug, Clone)]
pub struct AccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The source of the creation and update times.
    pub clock: Clock,
}

impl FromRef<AppState> for AccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            clock: state.clock.clone(),
        }
    }
}

const ACCOUNT_COLUMNS: &str =
    "id, name, type, balance, currency, description, user_id, created_at, updated_at";

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK (length(trim(name)) > 0),
            type TEXT NOT NULL DEFAULT 'savings'
                CHECK (type IN ('savings', 'checking', 'cash', 'credit', 'investment')),
            balance REAL NOT NULL DEFAULT 0 CHECK (balance >= 0),
            currency TEXT NOT NULL DEFAULT 'INR',
            description TEXT,
            user_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_account_user_created ON account(user_id, created_at);",
        (),
    )?;

    Ok(())
}

pub fn map_account_row(row: &Row) -> Result<Account, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let kind = row.get(2)?;
    let balance = row.get(3)?;
    let currency = row.get(4)?;
    let description = row.get(5)?;
    let user_id = row.get(6)?;
    let DbDateTime(created_at) = row.get(7)?;
    let DbDateTime(updated_at) = row.get(8)?;

    Ok(Account {
        id,
        name,
        kind,
        balance,
        currency,
        description,
        user_id,
        created_at,
        updated_at,
    })
}

fn not_found_if_no_rows(error: rusqlite::Error) -> Error {
    match error {
        rusqlite::Error::QueryReturnedNoRows => Error::AccountNotFound,
        error => error.into(),
    }
}

/// Create an account owned by `user_id`.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error, e.g. a negative balance.
pub fn create_account(
    details: AccountDetails,
    user_id: &str,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Account, Error> {
    let account = connection
        .prepare(&format!(
            "INSERT INTO account
                (name, type, balance, currency, description, user_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             RETURNING {ACCOUNT_COLUMNS}"
        ))?
        .query_row(
            (
                details.name,
                details.kind,
                details.balance.unwrap_or(0.0),
                details
                    .currency
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_owned()),
                details.description,
                user_id,
                DbDateTime(now),
            ),
            map_account_row,
        )?;

    Ok(account)
}

/// Get the account with `id` that belongs to `user_id`.
///
/// # Errors
/// Returns [Error::AccountNotFound] if the user has no such account, or
/// [Error::SqlError] if there is some other SQL error.
pub fn get_account(id: AccountId, user_id: &str, connection: &Connection) -> Result<Account, Error> {
    connection
        .prepare(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM account WHERE id = ?1 AND user_id = ?2"
        ))?
        .query_row((id, user_id), map_account_row)
        .map_err(not_found_if_no_rows)
}

/// Get all accounts of `user_id`, most recently created first.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_accounts(user_id: &str, connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM account WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC"
        ))?
        .query_map([user_id], map_account_row)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}

/// Overwrite the account with `id` that belongs to `user_id`.
///
/// # Errors
/// Returns [Error::AccountNotFound] if the user has no such account, or
/// [Error::SqlError] if there is some other SQL error.
pub fn update_account(
    id: AccountId,
    user_id: &str,
    details: AccountDetails,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Account, Error> {
    connection
        .prepare(&format!(
            "UPDATE account
             SET name = ?1,
                 type = ?2,
                 balance = COALESCE(?3, balance),
                 currency = COALESCE(?4, currency),
                 description = ?5,
                 updated_at = ?6
             WHERE id = ?7 AND user_id = ?8
             RETURNING {ACCOUNT_COLUMNS}"
        ))?
        .query_row(
            (
                details.name,
                details.kind,
                details.balance,
                details.currency,
                details.description,
                DbDateTime(now),
                id,
                user_id,
            ),
            map_account_row,
        )
        .map_err(not_found_if_no_rows)
}

/// Set the balance of the account with `id` that belongs to `user_id`.
///
/// # Errors
/// Returns [Error::AccountNotFound] if the user has no such account, or
/// [Error::SqlError] if there is some other SQL error, e.g. a negative balance.
pub fn set_balance(
    id: AccountId,
    user_id: &str,
    balance: f64,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Account, Error> {
    connection
        .prepare(&format!(
            "UPDATE account SET balance = ?1, updated_at = ?2 WHERE id = ?3 AND user_id = ?4
             RETURNING {ACCOUNT_COLUMNS}"
        ))?
        .query_row(
            (balance, DbDateTime(now), id, user_id),
            map_account_row,
        )
        .map_err(not_found_if_no_rows)
}

/// Delete the account with `id` that belongs to `user_id`.
///
/// # Errors
/// Returns [Error::AccountNotFound] if the user has no such account, or
/// [Error::SqlError] if there is some other SQL error.
pub fn delete_account(id: AccountId, user_id: &str, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM account WHERE id = ?1 AND user_id = ?2",
        (id, user_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::AccountNotFound);
    }

    Ok(())
}
