//! Defines the app level error type and its conversion to JSON responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{transaction::LockedAction, validation::FieldError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more fields of the request were missing, malformed or out of
    /// range.
    ///
    /// The client should fix the listed fields and try again.
    #[error("validation failed: {0:?}")]
    Validation(Vec<FieldError>),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The transaction does not exist or belongs to another user.
    #[error("the transaction could not be found")]
    TransactionNotFound,

    /// The account does not exist or belongs to another user.
    #[error("the account could not be found")]
    AccountNotFound,

    /// The transaction is older than the edit window and can no longer be
    /// changed.
    #[error("cannot {0} transaction after 12 hours")]
    TransactionLocked(LockedAction),

    /// The source account of a transfer holds less than the transfer amount.
    #[error("insufficient balance: {available} available, {requested} requested")]
    InsufficientFunds {
        /// The amount the client asked to move.
        requested: f64,
        /// The balance of the source account.
        available: f64,
    },

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, body) = match self {
            Error::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Validation failed", "errors": errors }),
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                json!({ "message": "Resource not found" }),
            ),
            Error::TransactionNotFound => (
                StatusCode::NOT_FOUND,
                json!({ "message": "Transaction not found" }),
            ),
            Error::AccountNotFound => (
                StatusCode::NOT_FOUND,
                json!({ "message": "Account not found" }),
            ),
            Error::TransactionLocked(action) => (
                StatusCode::FORBIDDEN,
                json!({ "message": format!("Cannot {action} transaction after 12 hours") }),
            ),
            Error::InsufficientFunds { .. } => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Insufficient balance" }),
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Something went wrong!" }),
                )
            }
        };

        (status_code, Json(body)).into_response()
    }
}
