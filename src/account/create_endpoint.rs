//! Defines the endpoint for creating a new account.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    Error, Identity,
    account::{Account, core::AccountState, create_account, form::AccountForm},
};

/// A route handler for creating a new account.
///
/// Responds with 201 and the stored account.
pub async fn create_account_endpoint(
    State(state): State<AccountState>,
    identity: Identity,
    form: Result<Json<AccountForm>, JsonRejection>,
) -> Result<(StatusCode, Json<Account>), Error> {
    let Json(form) = form?;
    let details = form.validate()?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let account = create_account(details, &identity.uid, state.clock.now(), &connection)?;

    tracing::debug!("Created account {} for user {}", account.id, identity.uid);

    Ok((StatusCode::CREATED, Json(account)))
}
