//! Defines the endpoint for deleting an account.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    Error, Identity,
    account::{AccountId, core::AccountState, delete_account},
};

/// A route handler for deleting an account.
///
/// Transactions are not linked to accounts, so nothing else is removed.
pub async fn delete_account_endpoint(
    State(state): State<AccountState>,
    identity: Identity,
    Path(account_id): Path<AccountId>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_account(account_id, &identity.uid, &connection)?;

    Ok(Json(json!({ "message": "Account deleted successfully" })))
}
