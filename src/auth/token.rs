//! Verification of the JSON Web Tokens sent as bearer credentials.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::auth::{AuthError, UserId};

/// The contents of a JSON Web Token that this service cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The user the token was issued to.
    pub sub: UserId,
    /// The user's email address, if the identity provider shared it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// The expiry time of the token as a Unix timestamp.
    pub exp: usize,
}

/// Checks the signature and standard claims of bearer tokens.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// A verifier for tokens signed with HS256 using a shared `secret`.
    ///
    /// When `issuer` or `audience` are given, tokens must carry a matching
    /// `iss` or `aud` claim.
    pub fn from_secret(secret: &[u8], issuer: Option<&str>, audience: Option<&str>) -> Self {
        Self::new(
            DecodingKey::from_secret(secret),
            Algorithm::HS256,
            issuer,
            audience,
        )
    }

    /// A verifier for tokens signed with RS256, checked against the RSA public
    /// key in `pem`.
    ///
    /// # Errors
    /// Returns an error if `pem` is not a valid PEM encoded RSA public key.
    pub fn from_rsa_pem(
        pem: &[u8],
        issuer: Option<&str>,
        audience: Option<&str>,
    ) -> Result<Self, jsonwebtoken::errors::Error> {
        Ok(Self::new(
            DecodingKey::from_rsa_pem(pem)?,
            Algorithm::RS256,
            issuer,
            audience,
        ))
    }

    fn new(
        decoding_key: DecodingKey,
        algorithm: Algorithm,
        issuer: Option<&str>,
        audience: Option<&str>,
    ) -> Self {
        let mut validation = Validation::new(algorithm);

        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            decoding_key,
            validation,
        }
    }

    /// Decode `token` and check its signature, expiry, issuer and audience.
    ///
    /// # Errors
    /// Returns [AuthError::InvalidToken] if any check fails or the token has
    /// an empty subject.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|error| {
                tracing::debug!("Rejected bearer token: {error}");
                AuthError::InvalidToken
            })?;

        if claims.sub.trim().is_empty() {
            tracing::debug!("Rejected bearer token with an empty subject");
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }
}
