//! Totals and breakdowns over a set of transactions.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Identity,
    transaction::{
        Division, Transaction, TransactionType,
        core::TransactionState,
        query::{RangeQuery, TransactionFilter, query_transactions},
    },
};

/// The amount of money per [Division].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DivisionBreakdown {
    /// The sum over personal transactions.
    pub personal: f64,
    /// The sum over office transactions.
    pub office: f64,
}

impl DivisionBreakdown {
    fn add(&mut self, division: Division, amount: f64) {
        match division {
            Division::Personal => self.personal += amount,
            Division::Office => self.office += amount,
        }
    }
}

/// Aggregate figures for a set of transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expense: f64,
    /// `total_income - total_expense`.
    pub balance: f64,
    /// The sum of the amounts in each category.
    ///
    /// Income and expenses that share a category are added together.
    pub category_breakdown: BTreeMap<String, f64>,
    /// The sum of the amounts in each division.
    pub division_breakdown: DivisionBreakdown,
    /// How many transactions were summarised.
    pub transaction_count: usize,
}

/// Summarise `transactions` in a single pass.
///
/// The result does not depend on the order of the transactions.
pub fn summarize<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Summary {
    let mut summary = Summary::default();

    for transaction in transactions {
        match transaction.kind {
            TransactionType::Income => summary.total_income += transaction.amount,
            TransactionType::Expense => summary.total_expense += transaction.amount,
        }

        *summary
            .category_breakdown
            .entry(transaction.category.clone())
            .or_insert(0.0) += transaction.amount;

        summary
            .division_breakdown
            .add(transaction.division, transaction.amount);

        summary.transaction_count += 1;
    }

    summary.balance = summary.total_income - summary.total_expense;

    summary
}

/// A route handler for summarising the user's transactions.
///
/// Without a date range or period, every transaction of the user is included.
pub async fn get_summary_endpoint(
    State(state): State<TransactionState>,
    identity: Identity,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Summary>, Error> {
    let filter = TransactionFilter {
        range: query.parse(state.clock.now())?,
        ..Default::default()
    };

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;
    let transactions = query_transactions(&identity.uid, &filter, &connection)?;

    Ok(Json(summarize(&transactions)))
}
