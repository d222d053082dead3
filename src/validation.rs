//! Field-level validation for JSON request bodies and query strings.
//!
//! Handlers check every field and report all problems at once, so the client
//! gets one 400 response listing each invalid field.

use std::str::FromStr;

use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use crate::Error;

/// A problem with a single field of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// The name of the offending field as the client sent it, e.g. "amount".
    pub field: String,
    /// A human readable description of what is wrong.
    pub message: String,
}

/// A number that the client may send either as a JSON number or as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    /// A JSON number, e.g. `12.5`.
    Number(f64),
    /// A JSON string holding a number, e.g. `"12.5"`.
    Text(String),
}

impl NumberInput {
    /// The finite value of the input, if it has one.
    pub fn to_f64(&self) -> Option<f64> {
        let value = match self {
            NumberInput::Number(number) => Some(*number),
            NumberInput::Text(text) => text.trim().parse().ok(),
        };

        value.filter(|number: &f64| number.is_finite())
    }
}

impl From<f64> for NumberInput {
    fn from(value: f64) -> Self {
        NumberInput::Number(value)
    }
}

/// The largest amount or balance a client may send.
///
/// Sums of values up to this size stay finite and exact to the cent.
pub const MAX_AMOUNT: f64 = 1e12;

/// Collects [FieldError]s while a request is checked.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error against `field`.
    pub fn add(&mut self, field: &str, message: &str) {
        self.errors.push(FieldError {
            field: field.to_owned(),
            message: message.to_owned(),
        });
    }

    /// A trimmed, non-empty string.
    pub fn required_text(
        &mut self,
        field: &str,
        value: Option<&str>,
        message: &str,
    ) -> Option<String> {
        match value.map(str::trim) {
            Some(text) if !text.is_empty() => Some(text.to_owned()),
            _ => {
                self.add(field, message);
                None
            }
        }
    }

    /// One of the values accepted by `T::from_str`.
    pub fn required_choice<T: FromStr>(
        &mut self,
        field: &str,
        value: Option<&str>,
        message: &str,
    ) -> Option<T> {
        match value.map(|text| text.trim().parse::<T>()) {
            Some(Ok(choice)) => Some(choice),
            _ => {
                self.add(field, message);
                None
            }
        }
    }

    /// Like [Validator::required_choice], but a missing or blank value is fine.
    pub fn optional_choice<T: FromStr>(
        &mut self,
        field: &str,
        value: Option<&str>,
        message: &str,
    ) -> Option<T> {
        match value.map(str::trim) {
            None | Some("") => None,
            Some(text) => self.required_choice(field, Some(text), message),
        }
    }

    /// A number from zero to [MAX_AMOUNT].
    pub fn required_non_negative(
        &mut self,
        field: &str,
        value: Option<&NumberInput>,
        message: &str,
    ) -> Option<f64> {
        match value.and_then(NumberInput::to_f64) {
            Some(number) if (0.0..=MAX_AMOUNT).contains(&number) => Some(number),
            _ => {
                self.add(field, message);
                None
            }
        }
    }

    /// A number greater than zero and at most [MAX_AMOUNT].
    pub fn required_positive(
        &mut self,
        field: &str,
        value: Option<&NumberInput>,
        message: &str,
    ) -> Option<f64> {
        match value.and_then(NumberInput::to_f64) {
            Some(number) if number > 0.0 && number <= MAX_AMOUNT => Some(number),
            _ => {
                self.add(field, message);
                None
            }
        }
    }

    /// Like [Validator::required_non_negative], but the field may be absent.
    pub fn optional_non_negative(
        &mut self,
        field: &str,
        value: Option<&NumberInput>,
        message: &str,
    ) -> Option<f64> {
        value.and_then(|value| self.required_non_negative(field, Some(value), message))
    }

    /// Whether no errors have been recorded so far.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fail with [Error::Validation] if any errors were recorded.
    pub fn finish(self) -> Result<(), Error> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self.errors))
        }
    }
}

/// Trim `value` and drop it if nothing is left.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation(vec![FieldError {
            field: "body".to_owned(),
            message: rejection.body_text(),
        }])
    }
}
