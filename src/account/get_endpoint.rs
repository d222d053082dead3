//! Defines the endpoints for reading a user's accounts.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error, Identity,
    account::{Account, AccountId, core::AccountState, get_account, get_accounts},
};

/// A route handler for listing the user's accounts, newest first.
pub async fn get_accounts_endpoint(
    State(state): State<AccountState>,
    identity: Identity,
) -> Result<Json<Vec<Account>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_accounts(&identity.uid, &connection).map(Json)
}

/// A route handler for getting one of the user's accounts by its ID.
pub async fn get_account_endpoint(
    State(state): State<AccountState>,
    identity: Identity,
    Path(account_id): Path<AccountId>,
) -> Result<Json<Account>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_account(account_id, &identity.uid, &connection).map(Json)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use time::{Duration, macros::datetime};

    use crate::{
        AppState, Clock,
        account::Account,
        build_router,
        endpoints::{self, format_endpoint},
        test_utils::{
            account_body, auth_header, bearer, get_test_app_state, get_test_server, mint_token,
            must_post,
        },
    };

    #[tokio::test]
    async fn lists_own_accounts_newest_first() {
        let start = datetime!(2025-10-15 08:00:00 UTC);
        let state = get_test_app_state(Clock::fixed(start));
        let server = TestServer::try_new(build_router(state.clone()))
            .expect("Could not create test server.");
        must_post(&server, endpoints::ACCOUNTS, &account_body("Older", 1.0)).await;

        // A second server over the same database, an hour later.
        let later_state = AppState {
            clock: Clock::fixed(start + Duration::hours(1)),
            ..state
        };
        let later = TestServer::try_new(build_router(later_state))
            .expect("Could not create test server.");
        must_post(&later, endpoints::ACCOUNTS, &account_body("Newer", 2.0)).await;
        later
            .post(endpoints::ACCOUNTS)
            .add_header("authorization", bearer(&mint_token("user-2", None)))
            .json(&account_body("Someone else's", 3.0))
            .await
            .assert_status(StatusCode::CREATED);

        let response = later
            .get(endpoints::ACCOUNTS)
            .add_header("authorization", auth_header())
            .await;

        response.assert_status_ok();
        let names: Vec<String> = response
            .json::<Vec<Account>>()
            .into_iter()
            .map(|account| account.name)
            .collect();
        assert_eq!(names, ["Newer", "Older"]);
    }

    #[tokio::test]
    async fn get_by_id() {
        let server = get_test_server();
        let id = must_post(&server, endpoints::ACCOUNTS, &account_body("Wallet", 5.0)).await;

        let response = server
            .get(&format_endpoint(endpoints::ACCOUNT, id))
            .add_header("authorization", auth_header())
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Account>().name, "Wallet");
    }

    #[tokio::test]
    async fn missing_account_is_not_found() {
        let server = get_test_server();

        server
            .get(&format_endpoint(endpoints::ACCOUNT, 7))
            .add_header("authorization", auth_header())
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
