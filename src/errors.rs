use thiserror::Error;

use crate::decimal::{Money, Rate};
use crate::types::AmortizationMethod;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoanError {
    #[error("wrong parameters ({}, {}, {}, {method:?})", display_opt(.amount), display_opt(.installments_number), display_opt(.interest_rate))]
    InvalidArgument {
        amount: Option<Money>,
        installments_number: Option<u32>,
        interest_rate: Option<Rate>,
        method: AmortizationMethod,
    },

    #[error("invariant violation: {message}")]
    InvariantViolation {
        message: String,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

fn display_opt<T: std::fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "undefined".to_string(),
    }
}

impl From<serde_json::Error> for LoanError {
    fn from(err: serde_json::Error) -> Self {
        LoanError::InvalidConfiguration {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
