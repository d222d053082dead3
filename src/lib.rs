//! Money Manager is a personal finance ledger.
//!
//! This library provides a JSON REST API for accounts, transactions, transfers
//! between accounts and transaction summaries. Every record belongs to the
//! user identified by the verified bearer token on the request.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod account;
mod app_state;
mod auth;
mod clock;
mod db;
mod endpoints;
mod error;
mod logging;
mod routing;
mod service;
mod timestamp;
mod transaction;
mod validation;

#[cfg(test)]
mod test_utils;

pub use account::{Account, AccountDetails, AccountId, AccountType, create_account};
pub use app_state::AppState;
pub use auth::{Claims, Identity, TokenVerifier, UserId};
pub use clock::Clock;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use transaction::{
    Division, DivisionBreakdown, EDIT_WINDOW, Summary, Transaction, TransactionBuilder,
    TransactionId, TransactionType, create_transaction, is_locked, summarize,
};
pub use validation::FieldError;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
