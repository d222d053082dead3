//! The extractor that turns a bearer token into the identity of the caller.

use axum::{
    Json, RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::{TokenVerifier, UserId};

/// The errors that reject a request before it reaches a protected handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The request has no `Authorization: Bearer` header.
    #[error("missing Authorization token")]
    MissingToken,
    /// The token is malformed, has a bad signature, or has expired.
    #[error("invalid or expired token")]
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Missing Authorization token",
            AuthError::InvalidToken => "Invalid or expired token",
        };

        (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response()
    }
}

/// The verified identity of the user making a request.
///
/// Adding this as a handler argument makes the route require a valid bearer
/// token. Requests without one are answered with 401 before the handler runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// The user's ID, used to scope every record they own.
    pub uid: UserId,
    /// The user's email address, if the identity provider shared it.
    pub email: Option<String>,
}

impl<S> FromRequestParts<S> for Identity
where
    TokenVerifier: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|rejection| {
                if rejection.is_missing() {
                    AuthError::MissingToken
                } else {
                    AuthError::InvalidToken
                }
            })?;

        let claims = TokenVerifier::from_ref(state).verify(bearer.token())?;

        Ok(Identity {
            uid: claims.sub,
            email: claims.email,
        })
    }
}

/// A route handler that tells the client who the server thinks they are.
pub async fn get_me(identity: Identity) -> Json<Identity> {
    Json(identity)
}
