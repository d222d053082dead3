//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{HeaderMap, HeaderValue, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Bodies longer than this many bytes are cut short in `info` level logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level with the
/// bearer token redacted. If a body is longer than [LOG_BODY_LENGTH_LIMIT]
/// bytes, it is truncated and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    log_request(&parts, &String::from_utf8_lossy(&body_bytes));

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            Bytes::new()
        }
    };

    log_response(&parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

fn redact_authorization(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();

    if headers.contains_key(AUTHORIZATION) {
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer ********"));
    }

    headers
}

/// Cut `body` down to at most [LOG_BODY_LENGTH_LIMIT] bytes without splitting
/// a character. Returns `None` if the body already fits.
fn truncate(body: &str) -> Option<&str> {
    if body.len() <= LOG_BODY_LENGTH_LIMIT {
        return None;
    }

    let mut end = LOG_BODY_LENGTH_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    Some(&body[..end])
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    let method = &parts.method;
    let uri = &parts.uri;
    let headers = redact_authorization(&parts.headers);

    match truncate(body) {
        Some(short_body) => {
            tracing::info!("Received request: {method} {uri} {headers:#?}\nbody: {short_body}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Received request: {method} {uri} {headers:#?}\nbody: {body:?}"),
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    let status = parts.status;
    let headers = &parts.headers;

    match truncate(body) {
        Some(short_body) => {
            tracing::info!("Sending response: {status} {headers:#?}\nbody: {short_body}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {status} {headers:#?}\nbody: {body:?}"),
    }
}
