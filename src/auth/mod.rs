//! Bearer token authentication.
//!
//! Tokens are issued by an external identity provider. This module only
//! verifies them and exposes the verified identity to route handlers through
//! the [Identity] extractor.

mod identity;
mod token;

pub use identity::{AuthError, Identity, get_me};
pub use token::{Claims, TokenVerifier};

/// The opaque identifier of a user, taken from the `sub` claim of their token.
pub type UserId = String;
