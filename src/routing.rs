//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::{
    AppState,
    account::{
        create_account_endpoint, delete_account_endpoint, edit_account_endpoint,
        get_account_endpoint, get_accounts_endpoint, transfer_endpoint,
    },
    auth::get_me,
    endpoints,
    service::{get_health, get_service_info},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        filter_transactions_endpoint, get_summary_endpoint, get_transaction_endpoint,
        get_transactions_endpoint, get_transactions_in_range_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Every route under `/api` requires a bearer token through the
/// [crate::Identity] extractor. `/` and `/health` do not.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_service_info))
        .route(endpoints::HEALTH, get(get_health));

    let transaction_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS_FILTER,
            get(filter_transactions_endpoint),
        )
        .route(endpoints::TRANSACTIONS_SUMMARY, get(get_summary_endpoint))
        .route(
            endpoints::TRANSACTIONS_DATE_RANGE,
            get(get_transactions_in_range_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        );

    let account_routes = Router::new()
        .route(
            endpoints::ACCOUNTS,
            get(get_accounts_endpoint).post(create_account_endpoint),
        )
        .route(endpoints::ACCOUNTS_TRANSFER, post(transfer_endpoint))
        .route(
            endpoints::ACCOUNT,
            get(get_account_endpoint)
                .put(edit_account_endpoint)
                .delete(delete_account_endpoint),
        );

    unprotected_routes
        .route(endpoints::ME, get(get_me))
        .merge(transaction_routes)
        .merge(account_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Route not found" })),
    )
        .into_response()
}
