//! Creates the application's database schema.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, account::create_account_table, transaction::create_transaction_table};

/// Create the tables for the domain models if they do not exist yet.
///
/// All tables are created inside one exclusive transaction, so a database is
/// either fully initialised or left untouched.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_account_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
