//! Defines the endpoint for updating a transaction.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use crate::{
    Error, Identity,
    transaction::{
        LockedAction, Transaction, TransactionId, core::TransactionState, ensure_editable,
        form::TransactionForm, get_transaction, update_transaction,
    },
};

/// A route handler for updating a transaction.
///
/// The body is checked first, then whether the transaction exists, then
/// whether it is still inside the edit window. A date left out of the body
/// keeps its current value.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    identity: Identity,
    Path(transaction_id): Path<TransactionId>,
    form: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<Json<Transaction>, Error> {
    let Json(form) = form?;
    let changes = form.validate()?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;
    let now = state.clock.now();

    let current = get_transaction(transaction_id, &identity.uid, &connection)?;
    ensure_editable(&current, LockedAction::Edit, now)?;

    let transaction =
        update_transaction(transaction_id, &identity.uid, changes, now, &connection)?;

    Ok(Json(transaction))
}
