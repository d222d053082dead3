//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - The edit window that locks old transactions
//! - Summaries over a user's transactions
//! - Route handlers for the transaction API

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod get_endpoint;
mod lock;
mod period;
mod query;
mod summary;

pub use core::{
    Division, Transaction, TransactionBuilder, TransactionId, TransactionType,
    create_transaction, create_transaction_table, delete_transaction, get_transaction,
    update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use get_endpoint::{
    filter_transactions_endpoint, get_transaction_endpoint, get_transactions_endpoint,
    get_transactions_in_range_endpoint,
};
pub use lock::{EDIT_WINDOW, LockedAction, ensure_editable, is_locked};
pub use summary::{DivisionBreakdown, Summary, get_summary_endpoint, summarize};
