//! Defines the endpoint for updating an account.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use crate::{
    Error, Identity,
    account::{Account, AccountId, core::AccountState, form::AccountForm, update_account},
};

/// A route handler for updating an account.
///
/// A balance or currency left out of the body keeps its current value.
pub async fn edit_account_endpoint(
    State(state): State<AccountState>,
    identity: Identity,
    Path(account_id): Path<AccountId>,
    form: Result<Json<AccountForm>, JsonRejection>,
) -> Result<Json<Account>, Error> {
    let Json(form) = form?;
    let details = form.validate()?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    update_account(
        account_id,
        &identity.uid,
        details,
        state.clock.now(),
        &connection,
    )
    .map(Json)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        account::{Account, AccountType},
        endpoints::{self, format_endpoint},
        test_utils::{account_body, auth_header, bearer, get_test_server, mint_token, must_post},
    };

    #[tokio::test]
    async fn updates_account() {
        let server = get_test_server();
        let id = must_post(&server, endpoints::ACCOUNTS, &account_body("Wallet", 20.0)).await;

        let response = server
            .put(&format_endpoint(endpoints::ACCOUNT, id))
            .add_header("authorization", auth_header())
            .json(&json!({ "name": "Cash jar", "type": "cash", "currency": "NZD" }))
            .await;

        response.assert_status_ok();
        let account = response.json::<Account>();
        assert_eq!(account.id, id);
        assert_eq!(account.name, "Cash jar");
        assert_eq!(account.kind, AccountType::Cash);
        assert_eq!(account.balance, 20.0);
        assert_eq!(account.currency, "NZD");
    }

    #[tokio::test]
    async fn invalid_body_is_rejected_before_lookup() {
        let server = get_test_server();

        let response = server
            .put(&format_endpoint(endpoints::ACCOUNT, 42))
            .add_header("authorization", auth_header())
            .json(&json!({ "name": "Wallet", "type": "tin" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["errors"][0]["message"],
            "Invalid account type"
        );
    }

    #[tokio::test]
    async fn other_users_account_is_not_found() {
        let server = get_test_server();
        let id = must_post(&server, endpoints::ACCOUNTS, &account_body("Wallet", 20.0)).await;

        let response = server
            .put(&format_endpoint(endpoints::ACCOUNT, id))
            .add_header("authorization", bearer(&mint_token("user-2", None)))
            .json(&account_body("Mine now", 1000.0))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["message"], "Account not found");
    }
}
