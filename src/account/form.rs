//! The JSON body for creating and updating accounts.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    account::{AccountDetails, AccountType},
    validation::{NumberInput, Validator, optional_text},
};

/// The fields a client sends to create or update an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountForm {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub balance: Option<NumberInput>,
    pub currency: Option<String>,
    pub description: Option<String>,
}

impl AccountForm {
    /// Check every field of the form.
    ///
    /// # Errors
    /// Returns [Error::Validation] listing each field that is missing or invalid.
    pub fn validate(&self) -> Result<AccountDetails, Error> {
        let mut validator = Validator::new();

        let name = validator.required_text(
            "name",
            self.name.as_deref(),
            "Account name is required",
        );
        let kind = validator.required_choice::<AccountType>(
            "type",
            self.kind.as_deref(),
            "Invalid account type",
        );
        let balance = validator.optional_non_negative(
            "balance",
            self.balance.as_ref(),
            "Balance must be a positive number",
        );

        validator.finish()?;

        let (Some(name), Some(kind)) = (name, kind) else {
            return Err(Error::Validation(Vec::new()));
        };

        Ok(AccountDetails {
            name,
            kind,
            balance,
            currency: optional_text(self.currency.as_deref()),
            description: optional_text(self.description.as_deref()),
        })
    }
}
