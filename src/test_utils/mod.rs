#![allow(missing_docs)]

use axum_test::TestServer;
use jsonwebtoken::{EncodingKey, Header, encode};
use rusqlite::Connection;
use serde_json::{Value, json};
use time::{Duration, OffsetDateTime};

use crate::{AppState, Claims, Clock, TokenVerifier, build_router};

pub const TEST_JWT_SECRET: &[u8] = b"test-secret-that-is-only-used-in-tests";

/// The owner used by tests that only need one user.
pub const TEST_USER: &str = "user-1";

/// An expiry time one hour from now, as a Unix timestamp.
pub fn future_expiry() -> usize {
    (OffsetDateTime::now_utc() + Duration::hours(1)).unix_timestamp() as usize
}

/// Sign a token for `sub` with [TEST_JWT_SECRET].
#[track_caller]
pub fn mint_token(sub: &str, email: Option<&str>) -> String {
    let claims = Claims {
        sub: sub.to_owned(),
        email: email.map(str::to_owned),
        exp: future_expiry(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET),
    )
    .expect("could not sign test token")
}

/// The value of an `Authorization` header carrying `token`.
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// An `Authorization` header value for [TEST_USER].
pub fn auth_header() -> String {
    bearer(&mint_token(TEST_USER, None))
}

#[track_caller]
pub fn get_test_app_state(clock: Clock) -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

    AppState::new(
        connection,
        TokenVerifier::from_secret(TEST_JWT_SECRET, None, None),
        clock,
    )
    .expect("Could not create app state")
}

/// A server for the full app backed by an empty in-memory database.
#[track_caller]
pub fn get_test_server() -> TestServer {
    get_test_server_with_clock(Clock::system())
}

#[track_caller]
pub fn get_test_server_with_clock(clock: Clock) -> TestServer {
    let app = build_router(get_test_app_state(clock));

    TestServer::try_new(app).expect("Could not create test server.")
}

/// A valid transaction body for `POST /api/transactions`.
pub fn transaction_body(kind: &str, amount: f64, category: &str) -> Value {
    json!({
        "type": kind,
        "amount": amount,
        "description": "Test transaction",
        "category": category,
        "division": "personal",
    })
}

/// A valid account body for `POST /api/accounts`.
pub fn account_body(name: &str, balance: f64) -> Value {
    json!({
        "name": name,
        "type": "savings",
        "balance": balance,
    })
}

/// Create a record through the API and return its `id`.
pub async fn must_post(server: &TestServer, path: &str, body: &Value) -> i64 {
    let response = server
        .post(path)
        .add_header("authorization", auth_header())
        .json(body)
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);

    response.json::<Value>()["id"]
        .as_i64()
        .expect("created record should have an integer id")
}
