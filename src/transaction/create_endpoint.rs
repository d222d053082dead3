//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    Error, Identity,
    transaction::{
        Transaction, core::TransactionState, create_transaction, form::TransactionForm,
    },
};

/// A route handler for creating a new transaction.
///
/// Responds with 201 and the stored transaction. The date defaults to now.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    identity: Identity,
    form: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let Json(form) = form?;
    let builder = form.validate()?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction =
        create_transaction(builder, &identity.uid, state.clock.now(), &connection)?;

    tracing::debug!(
        "Created transaction {} for user {}",
        transaction.id,
        identity.uid
    );

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use time::macros::datetime;

    use crate::{
        Clock, endpoints,
        test_utils::{auth_header, get_test_server, get_test_server_with_clock, transaction_body},
        transaction::{Division, Transaction, TransactionType},
    };

    #[tokio::test]
    async fn creates_transaction() {
        let now = datetime!(2025-10-15 08:00:00 UTC);
        let server = get_test_server_with_clock(Clock::fixed(now));

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header("authorization", auth_header())
            .json(&json!({
                "type": "expense",
                "amount": 42.5,
                "description": "Groceries",
                "category": "Food",
                "division": "office",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let transaction = response.json::<Transaction>();
        assert_eq!(transaction.id, 1);
        assert_eq!(transaction.kind, TransactionType::Expense);
        assert_eq!(transaction.amount, 42.5);
        assert_eq!(transaction.description, "Groceries");
        assert_eq!(transaction.category, "food");
        assert_eq!(transaction.division, Division::Office);
        assert_eq!(transaction.user_id, "user-1");
        assert_eq!(transaction.date, now);
        assert_eq!(transaction.created_at, now);
    }

    #[tokio::test]
    async fn response_uses_camel_case_and_rfc3339() {
        let server = get_test_server_with_clock(Clock::fixed(datetime!(2025-10-15 08:00:00 UTC)));

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header("authorization", auth_header())
            .json(&transaction_body("income", 1.0, "misc"))
            .await;

        let body = response.json::<Value>();
        assert_eq!(body["type"], "income");
        assert_eq!(body["userId"], "user-1");
        assert_eq!(body["date"], "2025-10-15T08:00:00Z");
        assert_eq!(body["createdAt"], "2025-10-15T08:00:00Z");
        assert_eq!(body["updatedAt"], "2025-10-15T08:00:00Z");
    }

    #[tokio::test]
    async fn invalid_body_lists_field_errors() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header("authorization", auth_header())
            .json(&json!({ "type": "expense", "amount": -1 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["message"], "Validation failed");
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|error| error["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, ["amount", "description", "category", "division"]);
    }

    #[tokio::test]
    async fn missing_division_is_rejected() {
        let server = get_test_server();
        let mut body = transaction_body("expense", 10.0, "food");
        body.as_object_mut().unwrap().remove("division");

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header("authorization", auth_header())
            .json(&body)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["errors"][0]["field"], "division");
        assert_eq!(
            body["errors"][0]["message"],
            "Division must be personal or office"
        );
    }

    #[tokio::test]
    async fn date_beyond_year_9999_in_utc_is_rejected() {
        let server = get_test_server();
        let mut body = transaction_body("expense", 10.0, "food");
        body["date"] = json!("9999-12-31T23:00:00-02:00");

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header("authorization", auth_header())
            .json(&body)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["errors"][0]["field"], "date");
        assert_eq!(body["errors"][0]["message"], "Invalid date format");
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header("authorization", auth_header())
            .add_header("content-type", "application/json")
            .text("{not json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["message"], "Validation failed");
    }

    #[tokio::test]
    async fn requires_token() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&transaction_body("income", 1.0, "misc"))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
