//! Accounts hold a balance of money, e.g. a bank account, wallet or credit card.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod get_endpoint;
mod transfer;

pub use core::{
    Account, AccountDetails, AccountId, AccountType, create_account, create_account_table,
    delete_account, get_account, get_accounts, set_balance, update_account,
};
pub use create_endpoint::create_account_endpoint;
pub use delete_endpoint::delete_account_endpoint;
pub use edit_endpoint::edit_account_endpoint;
pub use get_endpoint::{get_account_endpoint, get_accounts_endpoint};
pub use transfer::transfer_endpoint;
