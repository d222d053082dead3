//! Moves money between two of a user's accounts.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error, Identity,
    account::{Account, AccountId, core::AccountState, get_account, set_balance},
    validation::{FieldError, NumberInput, Validator},
};

/// The JSON body of a transfer request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferForm {
    pub from_account_id: Option<AccountId>,
    pub to_account_id: Option<AccountId>,
    pub amount: Option<NumberInput>,
}

/// A [TransferForm] that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidTransfer {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: f64,
}

impl TransferForm {
    /// Check every field of the form.
    ///
    /// # Errors
    /// Returns [Error::Validation] if an account id is missing, if the amount
    /// is not greater than zero, or if both ids name the same account.
    pub fn validate(&self) -> Result<ValidTransfer, Error> {
        let mut validator = Validator::new();

        if self.from_account_id.is_none() {
            validator.add("fromAccountId", "Source account is required");
        }
        if self.to_account_id.is_none() {
            validator.add("toAccountId", "Destination account is required");
        }
        let amount = validator.required_positive(
            "amount",
            self.amount.as_ref(),
            "Amount must be a positive number",
        );

        if let (Some(from), Some(to)) = (self.from_account_id, self.to_account_id)
            && from == to
        {
            validator.add("toAccountId", "Cannot transfer to the same account");
        }

        validator.finish()?;

        let (Some(from), Some(to), Some(amount)) = (self.from_account_id, self.to_account_id, amount)
        else {
            return Err(Error::Validation(Vec::new()));
        };

        Ok(ValidTransfer { from, to, amount })
    }
}

/// Move `amount` from the account `from` to the account `to`.
///
/// Both balances are written in one SQLite transaction: either both change or
/// neither does.
///
/// # Errors
/// Returns:
/// - [Error::AccountNotFound] if either account does not belong to `user_id`,
/// - [Error::InsufficientFunds] if the source balance is less than `amount`,
/// - [Error::Validation] if the new destination balance would not be finite,
/// - [Error::SqlError] if there is some other SQL error.
pub fn transfer(
    user_id: &str,
    from: AccountId,
    to: AccountId,
    amount: f64,
    now: OffsetDateTime,
    connection: &mut Connection,
) -> Result<(Account, Account), Error> {
    let transaction = connection.transaction()?;

    let source = get_account(from, user_id, &transaction)?;
    let destination = get_account(to, user_id, &transaction)?;

    if source.balance < amount {
        return Err(Error::InsufficientFunds {
            requested: amount,
            available: source.balance,
        });
    }

    let credited = destination.balance + amount;
    if !credited.is_finite() {
        return Err(Error::Validation(vec![FieldError {
            field: "amount".to_owned(),
            message: "Transfer would overflow the destination balance".to_owned(),
        }]));
    }

    let source = set_balance(from, user_id, source.balance - amount, now, &transaction)?;
    let destination = set_balance(to, user_id, credited, now, &transaction)?;

    transaction.commit()?;

    Ok((source, destination))
}

/// The response body of a successful transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResult {
    pub message: String,
    pub from_account: Account,
    pub to_account: Account,
}

/// A route handler for moving money between two of the user's accounts.
pub async fn transfer_endpoint(
    State(state): State<AccountState>,
    identity: Identity,
    form: Result<Json<TransferForm>, JsonRejection>,
) -> Result<Json<TransferResult>, Error> {
    let Json(form) = form?;
    let ValidTransfer { from, to, amount } = form.validate()?;

    let mut connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let (from_account, to_account) = transfer(
        &identity.uid,
        from,
        to,
        amount,
        state.clock.now(),
        &mut connection,
    )?;

    tracing::debug!(
        "Moved {amount} from account {from} to account {to} for user {}",
        identity.uid
    );

    Ok(Json(TransferResult {
        message: "Transfer successful".to_owned(),
        from_account,
        to_account,
    }))
}


#[cfg(test)]
mod endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        account::{Account, transfer::TransferResult},
        endpoints::{self, format_endpoint},
        test_utils::{account_body, auth_header, get_test_server, must_post},
    };

    async fn balance_of(server: &axum_test::TestServer, id: i64) -> f64 {
        server
            .get(&format_endpoint(endpoints::ACCOUNT, id))
            .add_header("authorization", auth_header())
            .await
            .json::<Account>()
            .balance
    }

    #[tokio::test]
    async fn transfer_then_overdraw() {
        let server = get_test_server();
        let a = must_post(&server, endpoints::ACCOUNTS, &account_body("A", 100.0)).await;
        let b = must_post(&server, endpoints::ACCOUNTS, &account_body("B", 50.0)).await;

        let response = server
            .post(endpoints::ACCOUNTS_TRANSFER)
            .add_header("authorization", auth_header())
            .json(&json!({ "fromAccountId": a, "toAccountId": b, "amount": 30 }))
            .await;

        response.assert_status_ok();
        let result = response.json::<TransferResult>();
        assert_eq!(result.message, "Transfer successful");
        assert_eq!(result.from_account.balance, 70.0);
        assert_eq!(result.to_account.balance, 80.0);

        let response = server
            .post(endpoints::ACCOUNTS_TRANSFER)
            .add_header("authorization", auth_header())
            .json(&json!({ "fromAccountId": a, "toAccountId": b, "amount": 200 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["message"], "Insufficient balance");
        assert_eq!(balance_of(&server, a).await, 70.0);
        assert_eq!(balance_of(&server, b).await, 80.0);
    }

    #[tokio::test]
    async fn unknown_account_is_not_found() {
        let server = get_test_server();
        let a = must_post(&server, endpoints::ACCOUNTS, &account_body("A", 100.0)).await;

        let response = server
            .post(endpoints::ACCOUNTS_TRANSFER)
            .add_header("authorization", auth_header())
            .json(&json!({ "fromAccountId": a, "toAccountId": 99, "amount": 10 }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["message"], "Account not found");
        assert_eq!(balance_of(&server, a).await, 100.0);
    }

    #[tokio::test]
    async fn same_account_is_rejected() {
        let server = get_test_server();
        let a = must_post(&server, endpoints::ACCOUNTS, &account_body("A", 100.0)).await;

        let response = server
            .post(endpoints::ACCOUNTS_TRANSFER)
            .add_header("authorization", auth_header())
            .json(&json!({ "fromAccountId": a, "toAccountId": a, "amount": 10 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["errors"][0]["field"], "toAccountId");
    }

    #[tokio::test]
    async fn huge_amount_is_rejected() {
        let server = get_test_server();
        let a = must_post(&server, endpoints::ACCOUNTS, &account_body("A", 100.0)).await;
        let b = must_post(&server, endpoints::ACCOUNTS, &account_body("B", 50.0)).await;

        let response = server
            .post(endpoints::ACCOUNTS_TRANSFER)
            .add_header("authorization", auth_header())
            .json(&json!({ "fromAccountId": a, "toAccountId": b, "amount": 1e308 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["errors"][0]["field"], "amount");
        assert_eq!(balance_of(&server, b).await, 50.0);
    }

    #[tokio::test]
    async fn missing_fields_are_listed() {
        let server = get_test_server();

        let response = server
            .post(endpoints::ACCOUNTS_TRANSFER)
            .add_header("authorization", auth_header())
            .json(&json!({ "amount": 0 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let fields: Vec<String> = response.json::<Value>()["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|error| error["field"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(fields, ["fromAccountId", "toAccountId", "amount"]);
    }
}
