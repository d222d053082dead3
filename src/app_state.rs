//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{Error, auth::TokenVerifier, clock::Clock, db::initialize};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// Checks the bearer tokens on protected routes.
    pub token_verifier: TokenVerifier,

    /// Where handlers get the current time from.
    pub clock: Clock,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        token_verifier: TokenVerifier,
        clock: Clock,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            token_verifier,
            clock,
        })
    }
}

// this impl tells the `Identity` extractor how to get the verifier from our state
impl FromRef<AppState> for TokenVerifier {
    fn from_ref(state: &AppState) -> Self {
        state.token_verifier.clone()
    }
}

impl FromRef<AppState> for Clock {
    fn from_ref(state: &AppState) -> Self {
        state.clock.clone()
    }
}
