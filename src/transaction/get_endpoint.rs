//! Defines the endpoints for reading a user's transactions.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    Error, Identity,
    transaction::{
        Transaction, TransactionId,
        core::TransactionState,
        get_transaction,
        query::{FilterQuery, RangeQuery, TransactionFilter, query_transactions},
    },
};

/// A route handler for listing all of the user's transactions, newest first.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionState>,
    identity: Identity,
) -> Result<Json<Vec<Transaction>>, Error> {
    list(&state, &identity, &TransactionFilter::default())
}

/// A route handler for getting one of the user's transactions by its ID.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    identity: Identity,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Transaction>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_transaction(transaction_id, &identity.uid, &connection).map(Json)
}

/// A route handler for listing the user's transactions that match the query
/// string, newest first.
pub async fn filter_transactions_endpoint(
    State(state): State<TransactionState>,
    identity: Identity,
    Query(query): Query<FilterQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let filter = query.parse(state.clock.now())?;

    list(&state, &identity, &filter)
}

/// A route handler for listing the user's transactions between two dates,
/// newest first. Both dates are required.
pub async fn get_transactions_in_range_endpoint(
    State(state): State<TransactionState>,
    identity: Identity,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let filter = TransactionFilter {
        range: query.parse_required(state.clock.now())?,
        ..Default::default()
    };

    list(&state, &identity, &filter)
}

fn list(
    state: &TransactionState,
    identity: &Identity,
    filter: &TransactionFilter,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    query_transactions(&identity.uid, filter, &connection).map(Json)
}
