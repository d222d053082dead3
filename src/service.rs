//! Unauthenticated endpoints that describe the service and report its health.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{Clock, endpoints};

/// The top level API paths, as listed by `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoints {
    pub transactions: String,
    pub accounts: String,
}

/// Describes the running service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub endpoints: ServiceEndpoints,
}

/// Reports that the service is up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    /// The server's current time in RFC 3339 format.
    pub timestamp: String,
}

pub async fn get_service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Money Manager API".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        endpoints: ServiceEndpoints {
            transactions: endpoints::TRANSACTIONS.to_owned(),
            accounts: endpoints::ACCOUNTS.to_owned(),
        },
    })
}

pub async fn get_health(State(clock): State<Clock>) -> Json<Health> {
    Json(Health {
        status: "OK".to_owned(),
        timestamp: format_timestamp(clock.now()),
    })
}

fn format_timestamp(now: OffsetDateTime) -> String {
    now.format(&Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{
        Clock, endpoints,
        service::{Health, ServiceInfo},
        test_utils::{get_test_server, get_test_server_with_clock},
    };

    #[tokio::test]
    async fn describes_service() {
        let server = get_test_server();

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_ok();
        let info = response.json::<ServiceInfo>();
        assert_eq!(info.message, "Money Manager API");
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(info.endpoints.transactions, "/api/transactions");
        assert_eq!(info.endpoints.accounts, "/api/accounts");
    }

    #[tokio::test]
    async fn reports_health() {
        let server =
            get_test_server_with_clock(Clock::fixed(datetime!(2025-10-15 08:00:00 UTC)));

        let response = server.get(endpoints::HEALTH).await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Health>(),
            Health {
                status: "OK".to_owned(),
                timestamp: "2025-10-15T08:00:00Z".to_owned(),
            }
        );
    }
}
