//! The JSON body for creating and updating transactions.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    timestamp::{Bound, parse_date_time},
    transaction::{Division, Transaction, TransactionBuilder, TransactionType},
    validation::{NumberInput, Validator},
};

/// The fields a client sends to create or update a transaction.
///
/// Every field is optional here so that missing and malformed fields are
/// reported together by [TransactionForm::validate].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionForm {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub amount: Option<NumberInput>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub division: Option<String>,
    /// An RFC 3339 date-time or a `YYYY-MM-DD` date.
    pub date: Option<String>,
}

impl TransactionForm {
    /// Check every field of the form.
    ///
    /// # Errors
    /// Returns [Error::Validation] listing each field that is missing or invalid.
    pub fn validate(&self) -> Result<TransactionBuilder, Error> {
        let mut validator = Validator::new();

        let kind = validator.required_choice::<TransactionType>(
            "type",
            self.kind.as_deref(),
            "Type must be income or expense",
        );
        let amount = validator.required_non_negative(
            "amount",
            self.amount.as_ref(),
            "Amount must be a positive number",
        );
        let description = validator.required_text(
            "description",
            self.description.as_deref(),
            "Description is required",
        );
        let category = validator.required_text(
            "category",
            self.category.as_deref(),
            "Category is required",
        );
        let division = validator.required_choice::<Division>(
            "division",
            self.division.as_deref(),
            "Division must be personal or office",
        );
        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => {
                let parsed = parse_date_time(text, Bound::Start);
                if parsed.is_none() {
                    validator.add("date", "Invalid date format");
                }
                parsed
            }
        };

        validator.finish()?;

        let (Some(kind), Some(amount), Some(description), Some(category), Some(division)) =
            (kind, amount, description, category, division)
        else {
            return Err(Error::Validation(Vec::new()));
        };

        let mut builder =
            Transaction::build(kind, amount, &description, &category).division(division);
        builder.date = date;

        Ok(builder)
    }
}
