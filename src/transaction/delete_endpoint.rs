//! Defines the endpoint for deleting a transaction.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    Error, Identity,
    transaction::{
        LockedAction, TransactionId, core::TransactionState, delete_transaction, ensure_editable,
        get_transaction,
    },
};

/// A route handler for deleting a transaction.
///
/// Fails with 404 if the user has no such transaction, and with 403 if the
/// transaction has left the edit window.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    identity: Identity,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, &identity.uid, &connection)?;
    ensure_editable(&transaction, LockedAction::Delete, state.clock.now())?;

    delete_transaction(transaction_id, &identity.uid, &connection)?;

    Ok(Json(json!({ "message": "Transaction deleted successfully" })))
}
