//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/accounts/{account_id}', use [format_endpoint].

/// The service descriptor.
pub const ROOT: &str = "/";
/// The liveness check.
pub const HEALTH: &str = "/health";

/// The route that returns the identity behind the bearer token.
pub const ME: &str = "/api/auth/me";

/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to list transactions matching a filter.
pub const TRANSACTIONS_FILTER: &str = "/api/transactions/filter";
/// The route to summarise transactions.
pub const TRANSACTIONS_SUMMARY: &str = "/api/transactions/summary";
/// The route to list transactions between two dates.
pub const TRANSACTIONS_DATE_RANGE: &str = "/api/transactions/date-range";

/// The route to list and create accounts.
pub const ACCOUNTS: &str = "/api/accounts";
/// The route to access a single account.
pub const ACCOUNT: &str = "/api/accounts/{account_id}";
/// The route to move money between two accounts.
pub const ACCOUNTS_TRANSFER: &str = "/api/accounts/transfer";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/accounts/{account_id}', '{account_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
